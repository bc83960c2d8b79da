use crate::config::Config;

pub const MOCK_CFG: &str = r#"
[web_server]
address = "127.0.0.1:3010"

[planner]

[schedule]
critical_moisture = 40
events = 4
"#;

pub fn mock_cfg() -> Config {
    Config::load_from_str(MOCK_CFG).unwrap_or_default()
}
