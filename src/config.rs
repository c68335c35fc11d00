//! Configuration handling for tabjson

use std::borrow::Cow;

/// Transformation applied to table names when they are written as JSON keys.
///
/// Only encoding applies it; decoding uses wire keys verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub enum NamingPolicy {
    #[default]
    Identity,
    /// `CustomerOrders` becomes `customerOrders`, `URLCache` becomes `urlCache`
    CamelCase,
    /// `CustomerOrders` becomes `customer_orders`
    SnakeCase,
    Custom(fn(&str) -> String),
}

impl NamingPolicy {
    /// Apply the policy to a name
    pub fn apply<'a>(&self, name: &'a str) -> Cow<'a, str> {
        match self {
            NamingPolicy::Identity => Cow::Borrowed(name),
            NamingPolicy::CamelCase => Cow::Owned(to_camel_case(name)),
            NamingPolicy::SnakeCase => Cow::Owned(to_snake_case(name)),
            NamingPolicy::Custom(transform) => Cow::Owned(transform(name)),
        }
    }
}

impl std::str::FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "identity" | "none" => Ok(NamingPolicy::Identity),
            "camel" | "camelcase" => Ok(NamingPolicy::CamelCase),
            "snake" | "snakecase" => Ok(NamingPolicy::SnakeCase),
            _ => Err(format!("Unknown naming policy: {}", s)),
        }
    }
}

fn lower(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Lowercase the leading run of capitals, leaving the capital that starts the
/// next word in place
fn to_camel_case(name: &str) -> String {
    let mut chars: Vec<char> = name.chars().collect();
    if !chars.first().is_some_and(|c| c.is_uppercase()) {
        return name.to_string();
    }

    for i in 0..chars.len() {
        if i == 1 && !chars[i].is_uppercase() {
            break;
        }
        if i > 0 {
            if let Some(next) = chars.get(i + 1).copied() {
                if !next.is_uppercase() {
                    if next.is_whitespace() {
                        chars[i] = lower(chars[i]);
                    }
                    break;
                }
            }
        }
        chars[i] = lower(chars[i]);
    }

    chars.into_iter().collect()
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let starts_word = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if starts_word && !out.ends_with('_') {
                out.push('_');
            }
            out.push(lower(c));
        } else {
            out.push(c);
        }
    }

    out
}

/// Configuration for encoding
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Policy applied to table names used as dataset keys
    pub naming: NamingPolicy,
    /// Indent the JSON output
    pub pretty: bool,
}

impl Config {
    /// Create a Config with compact output and unchanged table names
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table naming policy
    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Enable indented output
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case() {
        assert_eq!(to_camel_case("Table1"), "table1");
        assert_eq!(to_camel_case("CustomerOrders"), "customerOrders");
        assert_eq!(to_camel_case("URLCache"), "urlCache");
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(to_camel_case("My Table"), "my Table");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("CustomerOrders"), "customer_orders");
        assert_eq!(to_snake_case("URLCache"), "url_cache");
        assert_eq!(to_snake_case("Table1"), "table1");
        assert_eq!(to_snake_case("My Table"), "my_table");
    }

    #[test]
    fn test_custom_policy() {
        fn shout(name: &str) -> String {
            name.to_uppercase()
        }
        assert_eq!(NamingPolicy::Custom(shout).apply("orders"), "ORDERS");
        assert_eq!(NamingPolicy::Identity.apply("Orders"), "Orders");
    }

    #[test]
    fn test_policy_from_str() {
        assert!(matches!("camel".parse(), Ok(NamingPolicy::CamelCase)));
        assert!("kebab".parse::<NamingPolicy>().is_err());
    }
}
