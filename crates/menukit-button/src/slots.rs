//! Slot resolution for slot groups.
//!
//! A slot group names its slots with `slot` (a number, a list, a `"a-b"`
//! inclusive range, or a comma separated mix of those) and/or with
//! `position-x` / `position-y`, 1-based column and row. Both forms may be
//! combined; duplicates are dropped, first occurrence wins.

use menukit_contracts::{
    config::{ConfigValue, Section},
    error::{MenuError, MenuResult},
    settings::SLOTS_PER_ROW,
};

/// Slots in the largest inventory; a range may not reach past it.
const RANGE_LIMIT: usize = 6 * SLOTS_PER_ROW;

/// Resolve the slots `section` occupies, in declaration order.
pub fn resolve_slots(section: &Section) -> MenuResult<Vec<usize>> {
    let mut slots = Vec::new();

    if let Some(value) = section.get("slot") {
        for entry in value.to_string_list() {
            for token in entry.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                slots.extend(parse_token(token)?);
            }
        }
    }

    let x = section.get("position-x");
    let y = section.get("position-y");
    if x.is_some() || y.is_some() {
        let column = coordinate(x, "position-x")?;
        let row = coordinate(y, "position-y")?;
        if column > SLOTS_PER_ROW {
            return Err(MenuError::ConfigError {
                reason: format!("position-x must be between 1 and {}, got {}", SLOTS_PER_ROW, column),
            });
        }
        let slot = (row - 1)
            .checked_mul(SLOTS_PER_ROW)
            .and_then(|offset| offset.checked_add(column - 1))
            .ok_or_else(|| MenuError::ConfigError {
                reason: format!("position-y {} is out of range", row),
            })?;
        slots.push(slot);
    }

    let mut seen = Vec::with_capacity(slots.len());
    slots.retain(|slot| {
        if seen.contains(slot) {
            false
        } else {
            seen.push(*slot);
            true
        }
    });
    Ok(slots)
}

fn parse_token(token: &str) -> MenuResult<Vec<usize>> {
    let invalid = || MenuError::ConfigError {
        reason: format!("invalid slot '{}'", token),
    };
    match token.split_once('-') {
        Some((start, end)) => {
            let start: usize = start.trim().parse().map_err(|_| invalid())?;
            let end: usize = end.trim().parse().map_err(|_| invalid())?;
            if start > end {
                return Err(invalid());
            }
            if end >= RANGE_LIMIT {
                return Err(MenuError::ConfigError {
                    reason: format!("slot range '{}' reaches past slot {}", token, RANGE_LIMIT - 1),
                });
            }
            Ok((start..=end).collect())
        }
        None => Ok(vec![token.parse().map_err(|_| invalid())?]),
    }
}

/// A 1-based coordinate; missing means 1.
fn coordinate(value: Option<&ConfigValue>, key: &str) -> MenuResult<usize> {
    let Some(value) = value else {
        return Ok(1);
    };
    value
        .as_number()
        .filter(|n| n.fract() == 0.0 && *n >= 1.0)
        .map(|n| n as usize)
        .ok_or_else(|| MenuError::ConfigError {
            reason: format!("{} must be a positive whole number, got {:?}", key, value),
        })
}
