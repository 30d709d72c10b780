use std::{collections::HashMap, path::PathBuf};

use cooldowns::DEFAULT_ATTRIBUTE;

#[derive(Debug, Default)]
pub struct Config(pub HashMap<Parameter, String>);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Parameter {
    Dir,
    DbFilename,
    Attribute,
    LogLevel,
}

impl Parameter {
    pub fn deserialize(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dir" => Ok(Parameter::Dir),
            "dbfilename" => Ok(Parameter::DbFilename),
            "attribute" => Ok(Parameter::Attribute),
            "log-level" => Ok(Parameter::LogLevel),
            _ => anyhow::bail!("unknown parameter {:?}", s),
        }
    }

    pub fn serialize(&self) -> &'static str {
        match self {
            Parameter::Dir => "dir",
            Parameter::DbFilename => "dbfilename",
            Parameter::Attribute => "attribute",
            Parameter::LogLevel => "log-level",
        }
    }

    fn default_value(&self) -> &'static str {
        match self {
            Parameter::Dir => ".",
            Parameter::DbFilename => "cooldowns.json",
            Parameter::Attribute => DEFAULT_ATTRIBUTE,
            Parameter::LogLevel => "warn",
        }
    }
}

impl Config {
    pub fn get(&self, parameter: Parameter) -> &str {
        self.0
            .get(&parameter)
            .map(String::as_str)
            .unwrap_or_else(|| parameter.default_value())
    }

    pub fn path(&self) -> PathBuf {
        let mut p = PathBuf::new();
        p.push(self.get(Parameter::Dir));
        p.push(self.get(Parameter::DbFilename));
        p
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Config, Parameter};

    #[test]
    fn parameters() {
        assert_eq!(Parameter::deserialize("DIR").unwrap(), Parameter::Dir);
        assert_eq!(
            Parameter::deserialize("log-level").unwrap(),
            Parameter::LogLevel
        );
        assert!(Parameter::deserialize("port").is_err());
        assert_eq!(Parameter::DbFilename.serialize(), "dbfilename");
    }

    #[test]
    fn defaults() {
        let mut config = Config::default();
        assert_eq!(config.get(Parameter::Attribute), "cooldowns");
        assert_eq!(config.path(), PathBuf::from("./cooldowns.json"));

        config.0.insert(Parameter::Dir, "/var/lib/game".into());
        config.0.insert(Parameter::DbFilename, "griselda.json".into());
        assert_eq!(config.path(), PathBuf::from("/var/lib/game/griselda.json"));
    }
}
