use cooldowns::{AttributeStorage, Clock, CooldownStore};

#[derive(Debug, PartialEq)]
pub enum Command {
    List,
    Ready(Vec<String>),
    TimeLeft(Vec<String>),
    Set { name: String, seconds: i64 },
    Extend { name: String, seconds: i64 },
    Reset(String),
    Clear,
    Cleanup,
}

#[derive(Debug, PartialEq)]
pub enum Output {
    Names(Vec<String>),
    Ready(bool),
    Seconds(u64),
    Removed(usize),
    Done,
}

impl Command {
    pub fn deserialize(words: &[String]) -> anyhow::Result<Self> {
        let Some(verb) = words.first() else {
            anyhow::bail!("missing command");
        };
        let rest = &words[1..];
        match verb.to_ascii_lowercase().as_str() {
            "list" => Ok(Command::List),
            "ready" => Ok(Command::Ready(rest.to_vec())),
            "time-left" => Ok(Command::TimeLeft(rest.to_vec())),
            "set" => Ok(Command::Set {
                name: name_arg(rest, "SET")?,
                seconds: seconds_arg(rest),
            }),
            "extend" => Ok(Command::Extend {
                name: name_arg(rest, "EXTEND")?,
                seconds: seconds_arg(rest),
            }),
            "reset" => Ok(Command::Reset(name_arg(rest, "RESET")?)),
            "clear" => Ok(Command::Clear),
            "cleanup" => Ok(Command::Cleanup),
            command => Err(anyhow::format_err!(
                "unknown command {:?}",
                command.to_uppercase()
            )),
        }
    }

    pub fn execute<S, C>(&self, store: &mut CooldownStore<'_, S, C>) -> cooldowns::Result<Output>
    where
        S: AttributeStorage + ?Sized,
        C: Clock,
    {
        match self {
            Command::List => {
                let mut names = store.list_names();
                names.sort();
                Ok(Output::Names(names))
            }
            Command::Ready(names) => Ok(Output::Ready(store.ready(names))),
            Command::TimeLeft(names) => Ok(Output::Seconds(store.time_left(names))),
            Command::Set { name, seconds } => {
                store.set(name, *seconds)?;
                Ok(Output::Done)
            }
            Command::Extend { name, seconds } => {
                store.extend(name, *seconds)?;
                Ok(Output::Done)
            }
            Command::Reset(name) => {
                store.reset(name)?;
                Ok(Output::Done)
            }
            Command::Clear => {
                store.clear()?;
                Ok(Output::Done)
            }
            Command::Cleanup => Ok(Output::Removed(store.cleanup()?)),
        }
    }
}

impl Output {
    pub fn serialize(&self) -> Option<String> {
        match self {
            Output::Names(names) => Some(names.join("\n")).filter(|s| !s.is_empty()),
            Output::Ready(ready) => Some(ready.to_string()),
            Output::Seconds(seconds) => Some(seconds.to_string()),
            Output::Removed(removed) => Some(removed.to_string()),
            Output::Done => None,
        }
    }

    /// Whether the process should exit successfully. Only a negative
    /// `ready` answer counts as failure, so shell scripts can branch on it.
    pub fn success(&self) -> bool {
        !matches!(self, Output::Ready(false))
    }
}

fn name_arg(rest: &[String], command: &str) -> anyhow::Result<String> {
    match rest.first() {
        Some(name) => Ok(name.clone()),
        None => Err(anyhow::format_err!("malformed {} command", command)),
    }
}

// Missing or non-integer durations mean no time at all.
fn seconds_arg(rest: &[String]) -> i64 {
    rest.get(1)
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use cooldowns::{CooldownStore, ManualClock, MemoryAttributes, DEFAULT_ATTRIBUTE};

    use super::{Command, Output};

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn deserialize() {
        assert_eq!(Command::deserialize(&words("list")).unwrap(), Command::List);
        assert_eq!(
            Command::deserialize(&words("READY attack spell")).unwrap(),
            Command::Ready(words("attack spell"))
        );
        assert_eq!(
            Command::deserialize(&words("set attack 5")).unwrap(),
            Command::Set {
                name: "attack".into(),
                seconds: 5
            }
        );
        assert_eq!(
            Command::deserialize(&words("extend attack -3")).unwrap(),
            Command::Extend {
                name: "attack".into(),
                seconds: -3
            }
        );
        assert_eq!(
            Command::deserialize(&words("reset attack")).unwrap(),
            Command::Reset("attack".into())
        );
    }

    #[test]
    fn permissive_seconds() {
        assert_eq!(
            Command::deserialize(&words("set attack")).unwrap(),
            Command::Set {
                name: "attack".into(),
                seconds: 0
            }
        );
        assert_eq!(
            Command::deserialize(&words("set attack soon")).unwrap(),
            Command::Set {
                name: "attack".into(),
                seconds: 0
            }
        );
    }

    #[test]
    fn malformed() {
        assert!(Command::deserialize(&[]).is_err());
        assert!(Command::deserialize(&words("set")).is_err());
        assert!(Command::deserialize(&words("reset")).is_err());
        assert!(Command::deserialize(&words("fire attack")).is_err());
    }

    fn run(store: &mut CooldownStore<'_, MemoryAttributes, &ManualClock>, s: &str) -> Output {
        Command::deserialize(&words(s))
            .unwrap()
            .execute(store)
            .unwrap()
    }

    #[test]
    fn execute() {
        let mut attributes = MemoryAttributes::new();
        let clock = ManualClock::new(1_700_000_000.0);
        let mut store =
            CooldownStore::with_clock(&mut attributes, DEFAULT_ATTRIBUTE, &clock).unwrap();

        assert_eq!(run(&mut store, "set spell 10"), Output::Done);
        assert_eq!(run(&mut store, "extend spell 5"), Output::Done);
        assert_eq!(run(&mut store, "time-left spell"), Output::Seconds(15));
        assert_eq!(run(&mut store, "set attack 5"), Output::Done);
        assert_eq!(
            run(&mut store, "list"),
            Output::Names(words("attack spell"))
        );

        let output = run(&mut store, "ready attack");
        assert_eq!(output, Output::Ready(false));
        assert!(!output.success());

        clock.advance(6.0);
        assert_eq!(run(&mut store, "ready attack"), Output::Ready(true));
        assert_eq!(run(&mut store, "cleanup"), Output::Removed(1));
        assert_eq!(run(&mut store, "clear"), Output::Done);
        assert_eq!(run(&mut store, "list").serialize(), None);
    }

    #[test]
    fn serialize() {
        assert_eq!(
            Output::Names(words("a b")).serialize(),
            Some("a\nb".to_string())
        );
        assert_eq!(Output::Seconds(4).serialize(), Some("4".to_string()));
        assert_eq!(Output::Done.serialize(), None);
        assert!(Output::Ready(true).success());
    }
}
