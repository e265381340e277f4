use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub webdriver: WebdriverSettings,
    pub search: SearchSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct WebdriverSettings {
    pub url: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct SearchSettings {
    pub query: String,
    // Shown to the operator only, never appended to the submitted query
    pub location: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub target_count: usize,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_scroll_attempts: u32,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::new(
            "configuration.yaml",
            config::FileFormat::Yaml,
        ))
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::get_configuration;

    #[test]
    fn configuration_file_parses() {
        let settings = get_configuration().expect("Failed to read configuration.");

        assert_eq!(settings.search.query, "mechanics near me");
        assert_eq!(settings.search.target_count, 5);
        assert_eq!(settings.search.max_scroll_attempts, 30);
    }
}
