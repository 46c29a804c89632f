use std::fmt;

/// Value of an object-like macro
#[derive(Clone, PartialEq, Debug)]
pub enum DefineValue {
    /// `#define NAME` with nothing after it; only usable with `#ifdef` and `defined()`
    Flag,

    /// Evaluated or parsed numeric constant
    Number(f64),

    /// Anything else, verbatim
    Text(String),
}

impl DefineValue {
    /// Classify a literal value: empty is a flag, anything parsing as a float
    /// is a number, everything else is kept as text.
    pub fn from_literal(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            DefineValue::Flag
        } else if let Ok(number) = value.parse::<f64>() {
            DefineValue::Number(number)
        } else {
            DefineValue::Text(value.to_string())
        }
    }

    /// Text substituted for the macro name; `None` for flags.
    pub fn substitution(&self) -> Option<String> {
        match self {
            DefineValue::Flag => None,
            DefineValue::Number(n) => Some(n.to_string()),
            DefineValue::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for DefineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefineValue::Flag => Ok(()),
            DefineValue::Number(n) => write!(f, "{}", n),
            DefineValue::Text(s) => f.write_str(s),
        }
    }
}

/// Macro table which remembers definition order.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Defines {
    entries: Vec<(String, DefineValue)>,
}

impl Defines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse compiler-style predefines: `-DNAME` defines a flag, `-DNAME value`
    /// and `-DNAME=value` a valued macro. Other arguments are ignored.
    pub fn from_args(args: &str) -> Self {
        let mut defines = Self::new();
        let mut tokens = args.split_whitespace().peekable();

        while let Some(token) = tokens.next() {
            let name = match token.strip_prefix("-D") {
                Some("") => match tokens.next() {
                    Some(name) => name,
                    None => break,
                },
                Some(name) => name,
                None => continue,
            };

            if let Some((name, value)) = name.split_once('=') {
                log::debug!("predefined {} = {:?}", name, value);
                defines.set(name, DefineValue::from_literal(value));
                continue;
            }

            let value = match tokens.peek() {
                Some(value) if !value.starts_with('-') => {
                    let value = *value;
                    let _ = tokens.next();
                    DefineValue::from_literal(value)
                }
                _ => DefineValue::Flag,
            };

            log::debug!("predefined {} = {:?}", name, value);
            defines.set(name, value);
        }

        defines
    }

    pub fn get(&self, name: &str) -> Option<&DefineValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DefineValue> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Redefinition keeps the original position.
    pub fn set(&mut self, name: &str, value: DefineValue) {
        match self.get_mut(name) {
            Some(existing) => *existing = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<DefineValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DefineValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
