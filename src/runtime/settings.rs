use crate::config;

/// Load and validate settings; any problem falls back to defaults.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                eprintln!("jukebox: invalid config, using defaults: {msg}");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // The terminal is not up yet, so this still reaches the user.
            eprintln!("jukebox: failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
