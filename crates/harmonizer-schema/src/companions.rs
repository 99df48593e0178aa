//! Companion-field roles.
//!
//! A field `X` may be followed by `"X unit"` and/or `"X bin"`, giving the
//! column patterns `[X][X unit][X bin]`, `[X][X unit]` and `[X][X bin]`. The
//! roles are resolved once at compile time so the rule engine never matches
//! names at edit time.

use std::collections::HashMap;

use harmonizer_model::Field;

use crate::error::{Result, SchemaError};

pub const UNIT_SUFFIX: &str = " unit";
pub const BIN_SUFFIX: &str = " bin";

/// Role of a column in the companion pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnRole {
    #[default]
    Plain,
    /// A field followed by its unit and/or bin columns.
    Base {
        unit: Option<usize>,
        bin: Option<usize>,
    },
    Unit {
        base: usize,
    },
    Bin {
        base: usize,
    },
}

impl ColumnRole {
    pub fn is_companion(&self) -> bool {
        matches!(self, ColumnRole::Unit { .. } | ColumnRole::Bin { .. })
    }
}

/// Resolve the role of every column.
///
/// A companion-named field whose base does not exist is a plain field. One
/// whose base exists but sits elsewhere is rejected.
pub(crate) fn resolve_roles(
    fields: &[Field],
    columns: &HashMap<String, usize>,
) -> Result<Vec<ColumnRole>> {
    let mut roles = vec![ColumnRole::Plain; fields.len()];

    for (col, field) in fields.iter().enumerate() {
        if let Some(base_name) = field.name.strip_suffix(UNIT_SUFFIX)
            && let Some(&base) = columns.get(base_name)
        {
            if base + 1 != col {
                return Err(detached(field, base_name));
            }
            roles[col] = ColumnRole::Unit { base };
            set_base(&mut roles, base, Some(col), None);
        } else if let Some(base_name) = field.name.strip_suffix(BIN_SUFFIX)
            && let Some(&base) = columns.get(base_name)
        {
            let unit_between = base + 2 == col
                && fields[base + 1].name == format!("{base_name}{UNIT_SUFFIX}");
            if base + 1 != col && !unit_between {
                return Err(detached(field, base_name));
            }
            if field.flat_vocabulary.is_empty() {
                return Err(SchemaError::BinWithoutVocabulary {
                    field: field.name.clone(),
                });
            }
            roles[col] = ColumnRole::Bin { base };
            set_base(&mut roles, base, None, Some(col));
        }
    }

    Ok(roles)
}

fn set_base(roles: &mut [ColumnRole], base: usize, unit: Option<usize>, bin: Option<usize>) {
    roles[base] = match roles[base] {
        ColumnRole::Base {
            unit: old_unit,
            bin: old_bin,
        } => ColumnRole::Base {
            unit: unit.or(old_unit),
            bin: bin.or(old_bin),
        },
        _ => ColumnRole::Base { unit, bin },
    };
}

fn detached(field: &Field, base: &str) -> SchemaError {
    SchemaError::DetachedCompanion {
        field: field.name.clone(),
        base: base.to_string(),
    }
}
