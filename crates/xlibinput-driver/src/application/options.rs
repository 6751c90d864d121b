//! Host option lists as handed to pre-init.
//!
//! The X server passes driver options as a list of string pairs taken from
//! `xorg.conf` `InputClass`/`InputDevice` sections and from the hotplug
//! layer.  Option names compare loosely: case is ignored, and so are
//! underscores, spaces and tabs, so `"Device"`, `"device"` and `"DE_VICE"` all
//! name the same option.

/// Name of the required option carrying the device node path.
pub const DEVICE_OPTION: &str = "Device";

/// Name of the optional display-name option.
pub const IDENTIFIER_OPTION: &str = "Identifier";

/// An ordered list of host options.  Later entries do not override earlier
/// ones: lookup returns the first match, as the server does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOptions {
    entries: Vec<(String, String)>,
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((name.into(), value.into()));
        self
    }

    /// Appends an option.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the value of the first option whose name matches `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| option_names_equal(key, name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Device` option.
    pub fn device(&self) -> Option<&str> {
        self.get(DEVICE_OPTION)
    }

    /// The `Identifier` option.
    pub fn identifier(&self) -> Option<&str> {
        self.get(IDENTIFIER_OPTION)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Compares two option names the way the server's `xf86nameCompare` does.
pub fn option_names_equal(a: &str, b: &str) -> bool {
    let significant = |c: &char| !matches!(c, '_' | ' ' | '\t');
    let mut lhs = a.chars().filter(significant).map(|c| c.to_ascii_lowercase());
    let mut rhs = b.chars().filter(significant).map(|c| c.to_ascii_lowercase());
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => return true,
            (Some(x), Some(y)) if x == y => continue,
            _ => return false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
