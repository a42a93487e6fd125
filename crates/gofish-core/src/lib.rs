#![deny(warnings)]
pub mod game;
pub mod knowledge;
pub mod model;

pub struct EngineInfo;

impl EngineInfo {
    pub const fn name() -> &'static str {
        "gofish"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::EngineInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(EngineInfo::name(), "gofish");
        assert!(!EngineInfo::version().is_empty());
    }
}
