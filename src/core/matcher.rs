use crate::core::BlocklistSnapshot;

/// Matches a domain, and each of its parent domains, against a blocklist
/// snapshot. The bare top-level label is never tested on its own.
pub struct DomainMatcher<'a> {
    blocklist: &'a BlocklistSnapshot,
}

impl<'a> DomainMatcher<'a> {
    pub fn new(blocklist: &'a BlocklistSnapshot) -> Self {
        Self { blocklist }
    }

    pub fn is_disposable(&self, domain: &str) -> bool {
        self.matched_suffix(domain).is_some()
    }

    pub fn matched_suffix<'d>(&self, domain: &'d str) -> Option<&'d str> {
        candidate_suffixes(domain)
            .into_iter()
            .find(|candidate| self.blocklist.contains(candidate))
    }
}

/// `a.b.example.com` -> `a.b.example.com`, `b.example.com`, `example.com`
pub fn candidate_suffixes(domain: &str) -> Vec<&str> {
    let mut suffixes = Vec::new();
    let mut rest = domain;
    while let Some(pos) = rest.find('.') {
        suffixes.push(rest);
        rest = &rest[pos + 1..];
    }
    suffixes
}
