use super::{Group, SubUnit, Workload};
use crate::error::{BalanceError, BalanceResult};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;

const GROUP_SEPARATOR: &str = "SEPARATOR FOR TOPIC";
const UNIT_SEPARATOR: &str = "PARTITION SEPARATOR";

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Loads a workload. `.json` files hold an array of groups; anything else is
/// read as the separator-delimited text format.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> BalanceResult<Workload> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let workload = if is_json(path) {
        let groups: Vec<Group> = serde_json::from_str(&content)?;
        Workload::new(groups)?
    } else {
        parse_text(&content)?
    };

    info!(
        "Loaded workload from {}: {} groups x {} buckets",
        path.display(),
        workload.group_count(),
        workload.bucket_count()
    );
    Ok(workload)
}

pub fn save_to_file<P: AsRef<Path>>(workload: &Workload, path: P) -> BalanceResult<()> {
    let path = path.as_ref();
    let content = if is_json(path) {
        serde_json::to_string_pretty(workload.groups())?
    } else {
        to_text(workload)
    };
    fs::write(path, content)?;
    Ok(())
}

/// Text format: a `"<groups> <buckets>"` header, then per group the group
/// separator, its name, the unit separator and one `"<index> <value>"` line
/// per sub-unit.
pub fn to_text(workload: &Workload) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        workload.group_count(),
        workload.bucket_count()
    );
    for group in workload.groups() {
        out.push_str(GROUP_SEPARATOR);
        out.push_str(&group.name);
        out.push('\n');
        out.push_str(UNIT_SEPARATOR);
        for unit in &group.units {
            let _ = writeln!(out, "{} {}", unit.index, unit.value);
        }
    }
    out
}

fn parse_pair(line: &str, group: &str) -> BalanceResult<(usize, u64)> {
    let mut fields = line.split_whitespace();
    let (Some(idx), Some(val), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(BalanceError::Validation(format!(
            "group '{}': expected '<index> <value>', got '{}'",
            group, line
        )));
    };
    let index = idx.parse::<usize>().map_err(|e| {
        BalanceError::Validation(format!("group '{}': bad index '{}': {}", group, idx, e))
    })?;
    let value = val.parse::<u64>().map_err(|e| {
        BalanceError::Validation(format!("group '{}': bad value '{}': {}", group, val, e))
    })?;
    Ok((index, value))
}

pub fn parse_text(content: &str) -> BalanceResult<Workload> {
    let mut chunks = content.split(GROUP_SEPARATOR);
    let header = chunks.next().unwrap_or_default();

    let dims: Vec<usize> = header
        .split_whitespace()
        .map(|s| s.parse::<usize>())
        .collect::<Result<_, _>>()
        .map_err(|e| BalanceError::Validation(format!("bad header '{}': {}", header.trim(), e)))?;
    let [group_count, bucket_count] = dims[..] else {
        return Err(BalanceError::Validation(format!(
            "header must be '<groups> <buckets>', got '{}'",
            header.trim()
        )));
    };

    let mut groups = Vec::with_capacity(group_count);
    for chunk in chunks {
        let (name, body) = chunk.split_once(UNIT_SEPARATOR).ok_or_else(|| {
            BalanceError::Validation(format!(
                "group '{}' is missing its partition separator",
                chunk.lines().next().unwrap_or_default()
            ))
        })?;
        let name = name.trim_end_matches(['\r', '\n']).to_string();

        let mut units = Vec::with_capacity(bucket_count);
        for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (index, value) = parse_pair(line, &name)?;
            units.push(SubUnit { index, value });
        }
        groups.push(Group { name, units });
    }

    if groups.len() != group_count {
        return Err(BalanceError::Validation(format!(
            "header announces {} groups, file holds {}",
            group_count,
            groups.len()
        )));
    }
    if let Some(g) = groups.iter().find(|g| g.units.len() != bucket_count) {
        return Err(BalanceError::Validation(format!(
            "group '{}' has {} sub-units, header says {}",
            g.name,
            g.units.len(),
            bucket_count
        )));
    }

    Workload::new(groups)
}
