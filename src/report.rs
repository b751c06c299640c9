//! Console report printed after a build.

use std::io::{
    self,
    Write,
};

use crate::build::Artifact;

/// Formats an integer with `,` between groups of three digits.
///
/// # Examples
/// ```
/// use email_template_builder::report::group_thousands;
///
/// assert_eq!(group_thousands(25_000), "25,000");
/// assert_eq!(group_thousands(-1_234), "-1,234");
/// assert_eq!(group_thousands(999), "999");
/// ```
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Writes the four report lines for one artifact.
///
/// # Errors
/// Returns error if writing to `out` fails.
pub fn write_artifact_report(out: &mut impl Write, artifact: &Artifact) -> io::Result<()> {
    writeln!(out, "✅ Production template generated: {}", artifact.file_name())?;
    writeln!(out, "   Size: {} characters", group_thousands(to_i64(artifact.size)))?;
    writeln!(out, "   Limit: {} characters", group_thousands(to_i64(artifact.size_limit)))?;
    writeln!(out, "   Remaining: {} characters", group_thousands(artifact.remaining()))?;
    Ok(())
}

/// Writes the report for every artifact, in build order.
///
/// # Errors
/// Returns error if writing to `out` fails.
pub fn write_report(out: &mut impl Write, artifacts: &[Artifact]) -> io::Result<()> {
    for artifact in artifacts {
        write_artifact_report(out, artifact)?;
    }
    out.flush()
}

/// Widens a count for signed arithmetic, saturating at `i64::MAX`.
pub(crate) fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
