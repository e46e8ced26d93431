use std::collections::HashSet;

/// Source-IP allow-list. Matching is exact on the textual address, no CIDR.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    enabled: bool,
    allowed: HashSet<String>,
}

impl Whitelist {
    // Build from comma-separated IPs "1.1.1.1, 3.3.3.3", empty input disables the check
    pub fn from_list(list: &str) -> Self {
        if list.is_empty() {
            return Self::default();
        }
        Self {
            enabled: true,
            allowed: list.split(',').map(|ip| ip.trim().to_string()).collect(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_allowed(&self, source: &str) -> bool {
        !self.enabled || self.allowed.contains(source)
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_allows_everyone() {
        let list = Whitelist::from_list("");
        assert!(!list.is_enabled());
        assert!(list.is_allowed("10.1.2.3"));
        assert!(list.is_allowed("::1"));
    }

    #[test]
    fn entries_are_trimmed() {
        let list = Whitelist::from_list("1.1.1.1, 3.3.3.3 ");
        assert!(list.is_allowed("1.1.1.1"));
        assert!(list.is_allowed("3.3.3.3"));
        assert!(!list.is_allowed("2.2.2.2"));
    }

    #[test]
    fn no_prefix_or_cidr_matching() {
        let list = Whitelist::from_list("10.0.0.1,192.168.0.0/16");
        assert!(!list.is_allowed("10.0.0.10"));
        assert!(!list.is_allowed("192.168.1.1"));
    }
}
