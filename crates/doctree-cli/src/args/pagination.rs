//! Offset/limit arguments for paged output.

use clap::Args;

/// Validates that a limit value is at least 1.
fn validate_limit(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value == 0 {
        Err("limit must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Page position and size.
///
/// ```bash
/// doctree window docs guide.md --limit 10
/// doctree window docs guide.md --limit 10 --offset 20
/// ```
#[derive(Args, Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationArgs {
    /// Maximum number of items per page (defaults to the configured size)
    #[arg(
        short = 'l',
        long,
        value_name = "COUNT",
        value_parser = validate_limit,
        display_order = 50
    )]
    pub limit: Option<usize>,

    /// Number of items to skip before the page starts
    #[arg(long, value_name = "COUNT", display_order = 51)]
    pub offset: Option<usize>,
}

impl PaginationArgs {
    #[must_use]
    pub const fn offset_or_default(&self) -> usize {
        match self.offset {
            Some(offset) => offset,
            None => 0,
        }
    }
}
