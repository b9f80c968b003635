//! Value parsers for CLI arguments clap cannot check on its own

use std::net::Ipv4Addr;
use std::path::PathBuf;

/// Largest rollback accepted in one `migrate --rollback`
pub const MAX_ROLLBACK_STEPS: u32 = 100;

const MAX_HOSTNAME_LEN: usize = 253;

pub fn validate_port(raw: &str) -> Result<u16, String> {
    let port: u16 = raw
        .parse()
        .map_err(|_| format!("Port must be a number between 1 and 65535, got: '{raw}'"))?;

    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }

    Ok(port)
}

/// The file must exist and be readable.
pub fn validate_config_file_path(raw: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(raw);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{raw}'"));
    }
    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{raw}'"));
    }

    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read configuration file '{raw}': {e}"))
}

pub fn validate_rollback_steps(raw: &str) -> Result<u32, String> {
    let steps: u32 = raw
        .parse()
        .map_err(|_| format!("Rollback steps must be a positive number, got: '{raw}'"))?;

    match steps {
        0 => Err("Rollback steps must be greater than 0".to_string()),
        n if n > MAX_ROLLBACK_STEPS => Err(format!(
            "Rollback steps cannot exceed {MAX_ROLLBACK_STEPS}"
        )),
        n => Ok(n),
    }
}

/// Accepts IPv4 addresses and hostnames. Dotted all-numeric input must be a
/// valid IPv4 address.
pub fn validate_host_address(raw: &str) -> Result<String, String> {
    let host = raw.trim();

    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "Host address is too long (maximum {MAX_HOSTNAME_LEN} characters)"
        ));
    }

    if host.chars().all(|c| c.is_ascii_digit() || c == '.') && host.parse::<Ipv4Addr>().is_err()
    {
        return Err(format!("Invalid IPv4 address: '{raw}'"));
    }

    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_ports() {
        for ok in ["1", "80", "3000", "65535"] {
            assert!(validate_port(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["0", "65536", "-1", "abc", ""] {
            assert!(validate_port(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_hosts() {
        for ok in ["localhost", "127.0.0.1", "0.0.0.0", "10.0.0.1", "db.softskills.pt"] {
            assert_eq!(validate_host_address(ok).unwrap(), ok);
        }
        assert_eq!(validate_host_address("  localhost ").unwrap(), "localhost");

        let too_long = "x".repeat(300);
        for bad in ["", "   ", "my host", "999.999.999.999", "1.2.3", too_long.as_str()] {
            assert!(validate_host_address(bad).is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn test_rollback_steps() {
        assert_eq!(validate_rollback_steps("1").unwrap(), 1);
        assert_eq!(validate_rollback_steps("100").unwrap(), 100);
        for bad in ["0", "101", "-1", "abc", ""] {
            assert!(validate_rollback_steps(bad).is_err(), "'{bad}' should be rejected");
        }
    }

    #[test]
    fn test_config_file_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 3000").unwrap();
        let path = file.path().to_str().unwrap();
        assert_eq!(validate_config_file_path(path).unwrap(), file.path());

        let dir = tempfile::tempdir().unwrap();
        let err = validate_config_file_path(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not a file"));

        let missing = dir.path().join("missing.toml");
        let err = validate_config_file_path(missing.to_str().unwrap()).unwrap_err();
        assert!(err.contains("does not exist"));
    }
}
