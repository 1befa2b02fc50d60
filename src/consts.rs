pub const MAX_MACRO_INDEX: i64 = 9;
pub const MACRO_SLOT_COUNT: usize = MAX_MACRO_INDEX as usize + 1;
pub const MACRO_KEY_PREFIX: &str = "userCustomCommand_";

pub const COMMAND_NAMESPACE: &str = "n";
pub const DESCRIPTION_PREFIX: &str = "[NanoCmds]";

pub const MAX_SUGGESTION_DISTANCE: usize = 3;

pub const MAX_CONSOLE_ENTITIES: usize = 64;

const TICK_INTERVAL_FALLBACK: u64 = 50;

use std::env;

use crate::framework::PermissionLevel;

lazy_static! {
    pub static ref WORLD_PATH: String =
        env::var("WORLD_PATH").unwrap_or_else(|_| "world.json".to_string());
    pub static ref FALLBACK_DIMENSION: String =
        env::var("FALLBACK_DIMENSION").unwrap_or_else(|_| "overworld".to_string());
    pub static ref TICK_INTERVAL: u64 = parse_tick_interval(env::var("TICK_INTERVAL").ok());
    pub static ref CHEATS_ENABLED: bool =
        env::var("CHEATS_ENABLED").ok().and_then(|inner| parse_flag(&inner)).unwrap_or(true);
    pub static ref OPERATOR_LEVEL: PermissionLevel = env::var("OPERATOR_LEVEL")
        .ok()
        .and_then(|inner| inner.parse::<PermissionLevel>().ok())
        .unwrap_or(PermissionLevel::Host);
}

/// Tick period in milliseconds. Zero and unparsable values use the fallback, since
/// the tick timer needs a non-zero period.
pub fn parse_tick_interval(value: Option<String>) -> u64 {
    value
        .and_then(|inner| inner.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .unwrap_or(TICK_INTERVAL_FALLBACK)
}

/// Accepts `true`/`false`, `yes`/`no`, `y`/`n`, `on`/`off` and `1`/`0`, in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tick_interval_falls_back() {
        assert_eq!(parse_tick_interval(Some("0".to_string())), TICK_INTERVAL_FALLBACK);
        assert_eq!(parse_tick_interval(Some("-5".to_string())), TICK_INTERVAL_FALLBACK);
        assert_eq!(parse_tick_interval(Some("soon".to_string())), TICK_INTERVAL_FALLBACK);
        assert_eq!(parse_tick_interval(None), TICK_INTERVAL_FALLBACK);
        assert_eq!(parse_tick_interval(Some(" 20 ".to_string())), 20);
    }

    #[test]
    fn flags_accept_common_spellings() {
        for off in ["0", "false", "No", "n", "OFF"] {
            assert_eq!(parse_flag(off), Some(false), "{}", off);
        }
        for on in ["1", "TRUE", "yes", "y", "on"] {
            assert_eq!(parse_flag(on), Some(true), "{}", on);
        }

        assert_eq!(parse_flag("maybe"), None);
    }
}
