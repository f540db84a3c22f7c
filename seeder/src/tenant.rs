use util::config::AppConfig;

/// Identifies the school a run seeds.
///
/// `domain` is the well-known attribute used to find the tenant again in
/// single-phase runs; it also namespaces every natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    pub domain: String,
    pub name: String,
    pub name_ar: String,
}

impl TenantContext {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        name_ar: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into().trim().to_lowercase(),
            name: name.into(),
            name_ar: name_ar.into(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(&cfg.school_domain, &cfg.school_name, &cfg.school_name_ar)
    }
}

#[cfg(test)]
mod tests {
    use super::TenantContext;

    #[test]
    fn domain_is_normalized() {
        let tenant = TenantContext::new("  Demo.School.SA ", "Demo", "تجربة");
        assert_eq!(tenant.domain, "demo.school.sa");
    }
}
