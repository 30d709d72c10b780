//! Named cooldown timers kept in an entity's attributes.
//!
//! A cooldown is an absolute expiry time in epoch seconds stored under a
//! name. It is ready once that time has been reached, and a name that was
//! never set is always ready. Nothing fires on expiry; callers poll with
//! [`CooldownStore::ready`] and [`CooldownStore::time_left`].

use serde_json::{Map, Value};

use crate::{
    attributes::AttributeStorage,
    clock::{Clock, SystemClock},
    error::{Error, Result},
};

pub const DEFAULT_ATTRIBUTE: &str = "cooldowns";

/// Cooldowns bound to one attribute of an entity's storage.
///
/// The name to expiry mapping is read and edited where the storage keeps
/// it, and every change is flushed before the mutating call returns.
pub struct CooldownStore<'a, S, C = SystemClock>
where
    S: AttributeStorage + ?Sized,
    C: Clock,
{
    storage: &'a mut S,
    attribute: String,
    clock: C,
}

impl<'a, S> CooldownStore<'a, S>
where
    S: AttributeStorage + ?Sized,
{
    pub fn new(storage: &'a mut S) -> Result<Self> {
        Self::with_attribute(storage, DEFAULT_ATTRIBUTE)
    }

    pub fn with_attribute(storage: &'a mut S, attribute: impl Into<String>) -> Result<Self> {
        CooldownStore::with_clock(storage, attribute, SystemClock)
    }
}

impl<'a, S, C> CooldownStore<'a, S, C>
where
    S: AttributeStorage + ?Sized,
    C: Clock,
{
    /// Binds to `attribute`, creating an empty mapping there if the entity
    /// has none yet, then prunes expired cooldowns.
    pub fn with_clock(
        storage: &'a mut S,
        attribute: impl Into<String>,
        clock: C,
    ) -> Result<Self> {
        let attribute = attribute.into();
        if !storage.has(&attribute) {
            storage.add(&attribute, Value::Object(Map::new()))?;
        }
        match storage.get(&attribute) {
            Some(Value::Object(_)) => {}
            Some(_) => return Err(Error::NotAMapping { attribute }),
            None => return Err(Error::MissingAttribute { attribute }),
        }

        let mut store = CooldownStore {
            storage,
            attribute,
            clock,
        };
        store.cleanup()?;
        Ok(store)
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Every stored name, including expired ones not yet cleaned up.
    pub fn list_names(&self) -> Vec<String> {
        self.data()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn expiry(&self, name: &str) -> Option<i64> {
        self.data()?
            .get(name)
            .and_then(expiry_of)
            .map(|expiry| expiry as i64)
    }

    /// Whole seconds until every named cooldown is ready, rounded up.
    ///
    /// Names without a cooldown count as ready, so an empty or unknown set
    /// of names gives 0.
    pub fn time_left<I>(&self, names: I) -> u64
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let now = self.clock.now();
        let Some(data) = self.data() else {
            return 0;
        };
        names
            .into_iter()
            .filter_map(|name| data.get(name.as_ref()).and_then(expiry_of))
            .map(|expiry| expiry - now)
            .fold(0.0, f64::max)
            .ceil() as u64
    }

    /// True when all of the named cooldowns are ready.
    pub fn ready<I>(&self, names: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.time_left(names) == 0
    }

    /// Starts `name` counting down from now, replacing any existing value.
    ///
    /// Zero or negative `seconds` leaves the cooldown ready immediately.
    pub fn set(&mut self, name: &str, seconds: i64) -> Result<()> {
        let now = self.clock.now().floor() as i64;
        let expiry = now.saturating_add(seconds.max(0));
        self.data_mut()?.insert(name.to_string(), Value::from(expiry));
        tracing::debug!(attribute = %self.attribute, name, expiry, "set cooldown");
        self.storage.flush()
    }

    /// Adds `seconds` to whatever time `name` has left. On a ready cooldown
    /// this is the same as `set`.
    pub fn extend(&mut self, name: &str, seconds: i64) -> Result<()> {
        let left = i64::try_from(self.time_left([name])).unwrap_or(i64::MAX);
        self.set(name, left.saturating_add(seconds))
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        if self.data_mut()?.remove(name).is_some() {
            tracing::debug!(attribute = %self.attribute, name, "reset cooldown");
            self.storage.flush()?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.data_mut()?.clear();
        tracing::debug!(attribute = %self.attribute, "cleared cooldowns");
        self.storage.flush()
    }

    /// Deletes cooldowns whose expiry is strictly in the past, along with
    /// values that aren't timestamps at all. Returns how many were removed.
    ///
    /// A cooldown expiring exactly now is kept until the next cleanup.
    pub fn cleanup(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let data = self.data_mut()?;
        let before = data.len();
        data.retain(|_, value| matches!(expiry_of(value), Some(expiry) if expiry - now >= 0.0));
        let removed = before - data.len();

        if removed > 0 {
            tracing::debug!(attribute = %self.attribute, removed, "pruned expired cooldowns");
            self.storage.flush()?;
        }
        Ok(removed)
    }

    fn data(&self) -> Option<&Map<String, Value>> {
        self.storage.get(&self.attribute).and_then(Value::as_object)
    }

    fn data_mut(&mut self) -> Result<&mut Map<String, Value>> {
        match self.storage.get_mut(&self.attribute) {
            Some(Value::Object(data)) => Ok(data),
            Some(_) => Err(Error::NotAMapping {
                attribute: self.attribute.clone(),
            }),
            // Only a storage that drops attributes on its own gets here.
            None => Err(Error::MissingAttribute {
                attribute: self.attribute.clone(),
            }),
        }
    }
}

// Expiries written as floats are truncated to whole seconds.
fn expiry_of(value: &Value) -> Option<f64> {
    value.as_f64().map(f64::trunc)
}
