use anyhow::{Context, Result as AnyhowResult};
use std::io::{BufRead, Write};

/// Credentials and target for one export run.
///
/// Built once at start through either factory path ([`RunConfig::fixed`]
/// for embedded literals, [`RunConfig::interactive`] for prompts) and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Numeric application id issued by the platform.
    pub api_id: i64,
    /// Application secret issued alongside the id.
    pub api_hash: String,
    /// Phone number the session is bound to.
    pub phone: String,
    /// Group reference to resolve: an invite URL or a public handle.
    pub group_ref: String,
}

impl RunConfig {
    /// Builds a configuration from literal values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use group_roster::config::RunConfig;
    ///
    /// let config = RunConfig::fixed(
    ///     27_000_000,
    ///     "0123456789abcdef",
    ///     "+15550100",
    ///     "https://example.org/+invite",
    /// );
    /// assert_eq!(config.api_id, 27_000_000);
    /// ```
    pub fn fixed(api_id: i64, api_hash: &str, phone: &str, group_ref: &str) -> Self {
        Self {
            api_id,
            api_hash: api_hash.to_string(),
            phone: phone.to_string(),
            group_ref: group_ref.to_string(),
        }
    }

    /// Builds a configuration by prompting on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or the API id is not
    /// numeric; either aborts the run before any network activity.
    pub fn interactive() -> AnyhowResult<Self> {
        let stdin = std::io::stdin();
        Self::from_reader(stdin.lock(), std::io::stdout())
    }

    /// Prompts for the four configuration values on any reader/writer pair.
    ///
    /// Split out from [`RunConfig::interactive`] so the prompt flow is
    /// testable without a terminal.
    ///
    /// # Errors
    ///
    /// Returns an error on I/O failure or a non-numeric API id.
    pub fn from_reader(mut input: impl BufRead, mut output: impl Write) -> AnyhowResult<Self> {
        let api_id = prompt(&mut input, &mut output, "API id: ")?
            .parse::<i64>()
            .context("the API id must be numeric")?;
        let api_hash = prompt(&mut input, &mut output, "API hash: ")?;
        let phone = prompt(&mut input, &mut output, "Phone number: ")?;
        let group_ref = prompt(&mut input, &mut output, "Group link or handle: ")?;
        Ok(Self {
            api_id,
            api_hash,
            phone,
            group_ref,
        })
    }
}

/// Prints a prompt and reads one trimmed line.
fn prompt(input: &mut impl BufRead, output: &mut impl Write, label: &str) -> AnyhowResult<String> {
    write!(output, "{}", label).context("could not write prompt")?;
    output.flush().context("could not flush prompt")?;
    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("could not read configuration input")?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reader_collects_four_values() {
        let input = b"12345\nsecret-hash\n+15550100\nhttps://example.org/+abc\n" as &[u8];
        let mut prompts = Vec::new();
        let config = RunConfig::from_reader(input, &mut prompts).unwrap();
        assert_eq!(config.api_id, 12345);
        assert_eq!(config.api_hash, "secret-hash");
        assert_eq!(config.phone, "+15550100");
        assert_eq!(config.group_ref, "https://example.org/+abc");
        let shown = String::from_utf8(prompts).unwrap();
        assert!(shown.contains("API id: "));
        assert!(shown.contains("Group link or handle: "));
    }

    #[test]
    fn test_from_reader_rejects_non_numeric_id() {
        let input = b"not-a-number\n" as &[u8];
        let err = RunConfig::from_reader(input, Vec::<u8>::new()).unwrap_err();
        assert!(err.to_string().contains("numeric"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let input = b"  42 \n hash \n +1 \n grp \n" as &[u8];
        let config = RunConfig::from_reader(input, Vec::<u8>::new()).unwrap();
        assert_eq!(config.api_id, 42);
        assert_eq!(config.api_hash, "hash");
        assert_eq!(config.group_ref, "grp");
    }
}
