//! Running per-type statistics, maintained at both page and chunk scope.
//!
//! No trait object, no class hierarchy — a `match` on the
//! [`crate::value::ScalarType`] tag selects the concrete variant, and each
//! variant implements `update`/`merge`/`serialize`/`count` directly.

use byteorder::{WriteBytesExt, BE};
use std::io::{self, Write};

use crate::value::{Decimal, ScalarType, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolStats {
    count: u64,
    first: bool,
    last: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntStats {
    count: u64,
    min: i64,
    max: i64,
    first: i64,
    last: i64,
    /// Accumulated with wrapping arithmetic — see DESIGN.md for why wrapping
    /// was chosen over saturating.
    sum: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatStats {
    count: u64,
    min: f64,
    max: f64,
    first: f64,
    last: f64,
    sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecimalStats {
    count: u64,
    min: Decimal,
    max: Decimal,
    first: Decimal,
    last: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryStats {
    count: u64,
    first: Vec<u8>,
    last: Vec<u8>,
}

/// A running statistics aggregate for one series, dispatched on [`ScalarType`].
///
/// `count() == 0` means every other field is undefined; this is enforced by
/// only ever reading fields through `update`/`merge`/`serialize`, never a
/// bare getter.
#[derive(Debug, Clone, PartialEq)]
pub enum Stats {
    Bool(Option<BoolStats>),
    Int32(Option<IntStats>),
    Int64(Option<IntStats>),
    Float(Option<FloatStats>),
    Double(Option<FloatStats>),
    Decimal(Option<DecimalStats>),
    Binary(Option<BinaryStats>),
}

impl Stats {
    /// Constructs an empty statistics aggregate dispatched from the series' type tag.
    pub fn of_type(ty: ScalarType) -> Self {
        match ty {
            ScalarType::Bool => Stats::Bool(None),
            ScalarType::Int32 => Stats::Int32(None),
            ScalarType::Int64 => Stats::Int64(None),
            ScalarType::Float => Stats::Float(None),
            ScalarType::Double => Stats::Double(None),
            ScalarType::Decimal => Stats::Decimal(None),
            ScalarType::Binary => Stats::Binary(None),
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Stats::Bool(_) => ScalarType::Bool,
            Stats::Int32(_) => ScalarType::Int32,
            Stats::Int64(_) => ScalarType::Int64,
            Stats::Float(_) => ScalarType::Float,
            Stats::Double(_) => ScalarType::Double,
            Stats::Decimal(_) => ScalarType::Decimal,
            Stats::Binary(_) => ScalarType::Binary,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Stats::Bool(s) => s.map_or(0, |s| s.count),
            Stats::Int32(s) | Stats::Int64(s) => s.map_or(0, |s| s.count),
            Stats::Float(s) | Stats::Double(s) => s.map_or(0, |s| s.count),
            Stats::Decimal(s) => s.map_or(0, |s| s.count),
            Stats::Binary(s) => s.as_ref().map_or(0, |s| s.count),
        }
    }

    /// Folds `value` into the running aggregate. The writer guarantees
    /// `value`'s type matches this `Stats`'s type before ever calling this,
    /// so accumulation itself is infallible.
    pub fn update(&mut self, value: &Value) {
        match (self, value) {
            (Stats::Bool(slot), Value::Bool(v)) => {
                *slot = Some(match slot.take() {
                    None => BoolStats {
                        count: 1,
                        first: *v,
                        last: *v,
                    },
                    Some(s) => BoolStats {
                        count: s.count + 1,
                        first: s.first,
                        last: *v,
                    },
                });
            }
            (Stats::Int32(slot), Value::Int32(v)) => update_int(slot, *v as i64),
            (Stats::Int64(slot), Value::Int64(v)) => update_int(slot, *v),
            (Stats::Float(slot), Value::Float(v)) => update_float(slot, *v as f64),
            (Stats::Double(slot), Value::Double(v)) => update_float(slot, *v),
            (Stats::Decimal(slot), Value::Decimal(v)) => {
                *slot = Some(match slot.take() {
                    None => DecimalStats {
                        count: 1,
                        min: *v,
                        max: *v,
                        first: *v,
                        last: *v,
                    },
                    Some(s) => DecimalStats {
                        count: s.count + 1,
                        min: if v.unscaled < s.min.unscaled { *v } else { s.min },
                        max: if v.unscaled > s.max.unscaled { *v } else { s.max },
                        first: s.first,
                        last: *v,
                    },
                });
            }
            (Stats::Binary(slot), Value::Binary(v)) => {
                *slot = Some(match slot.take() {
                    None => BinaryStats {
                        count: 1,
                        first: v.clone(),
                        last: v.clone(),
                    },
                    Some(s) => BinaryStats {
                        count: s.count + 1,
                        first: s.first,
                        last: v.clone(),
                    },
                });
            }
            (stats, value) => unreachable!(
                "Stats::update type mismatch: {:?} stats given {:?} value",
                stats.scalar_type(),
                value.scalar_type()
            ),
        }
    }

    /// Merges `other` into `self` in place, as if `other`'s points had been
    /// inserted immediately after `self`'s. Associative, not commutative:
    /// `first`/`last` depend on order.
    pub fn merge(&mut self, other: &Stats) {
        match (self, other) {
            (Stats::Bool(a), Stats::Bool(b)) => merge_opt(a, b, |a, b| BoolStats {
                count: a.count + b.count,
                first: a.first,
                last: b.last,
            }),
            (Stats::Int32(a), Stats::Int32(b)) | (Stats::Int64(a), Stats::Int64(b)) => {
                merge_opt(a, b, |a, b| IntStats {
                    count: a.count + b.count,
                    min: a.min.min(b.min),
                    max: a.max.max(b.max),
                    first: a.first,
                    last: b.last,
                    sum: a.sum.wrapping_add(b.sum),
                })
            }
            (Stats::Float(a), Stats::Float(b)) | (Stats::Double(a), Stats::Double(b)) => {
                merge_opt(a, b, |a, b| FloatStats {
                    count: a.count + b.count,
                    min: a.min.min(b.min),
                    max: a.max.max(b.max),
                    first: a.first,
                    last: b.last,
                    sum: a.sum + b.sum,
                })
            }
            (Stats::Decimal(a), Stats::Decimal(b)) => merge_opt(a, b, |a, b| DecimalStats {
                count: a.count + b.count,
                min: if b.min.unscaled < a.min.unscaled {
                    b.min
                } else {
                    a.min
                },
                max: if b.max.unscaled > a.max.unscaled {
                    b.max
                } else {
                    a.max
                },
                first: a.first,
                last: b.last,
            }),
            (Stats::Binary(a), Stats::Binary(b)) => {
                let merged = match (a.take(), b.clone()) {
                    (None, rhs) => rhs,
                    (Some(a), None) => Some(a),
                    (Some(a), Some(b)) => Some(BinaryStats {
                        count: a.count + b.count,
                        first: a.first,
                        last: b.last,
                    }),
                };
                *a = merged;
            }
            (a, b) => unreachable!(
                "Stats::merge type mismatch: {:?} merged with {:?}",
                a.scalar_type(),
                b.scalar_type()
            ),
        }
    }

    /// Serializes this aggregate as a fixed-length, big-endian, type-specific
    /// layout (BINARY is the one variable-length exception, self-describing
    /// via length prefixes on `first`/`last`).
    pub fn serialize<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Stats::Bool(s) => {
                let s = s.unwrap_or(BoolStats {
                    count: 0,
                    first: false,
                    last: false,
                });
                w.write_u64::<BE>(s.count)?;
                w.write_u8(s.first as u8)?;
                w.write_u8(s.last as u8)?;
            }
            Stats::Int32(s) | Stats::Int64(s) => {
                let s = s.unwrap_or(IntStats {
                    count: 0,
                    min: 0,
                    max: 0,
                    first: 0,
                    last: 0,
                    sum: 0,
                });
                w.write_u64::<BE>(s.count)?;
                w.write_i64::<BE>(s.min)?;
                w.write_i64::<BE>(s.max)?;
                w.write_i64::<BE>(s.first)?;
                w.write_i64::<BE>(s.last)?;
                w.write_i64::<BE>(s.sum)?;
            }
            Stats::Float(s) | Stats::Double(s) => {
                let s = s.unwrap_or(FloatStats {
                    count: 0,
                    min: 0.0,
                    max: 0.0,
                    first: 0.0,
                    last: 0.0,
                    sum: 0.0,
                });
                w.write_u64::<BE>(s.count)?;
                w.write_f64::<BE>(s.min)?;
                w.write_f64::<BE>(s.max)?;
                w.write_f64::<BE>(s.first)?;
                w.write_f64::<BE>(s.last)?;
                w.write_f64::<BE>(s.sum)?;
            }
            Stats::Decimal(s) => {
                let zero = Decimal::new(0, 0);
                let s = s.unwrap_or(DecimalStats {
                    count: 0,
                    min: zero,
                    max: zero,
                    first: zero,
                    last: zero,
                });
                w.write_u64::<BE>(s.count)?;
                for d in [s.min, s.max, s.first, s.last] {
                    w.write_i128::<BE>(d.unscaled)?;
                    w.write_u8(d.scale)?;
                }
            }
            Stats::Binary(s) => match s {
                None => {
                    w.write_u64::<BE>(0)?;
                    w.write_u32::<BE>(0)?;
                    w.write_u32::<BE>(0)?;
                }
                Some(s) => {
                    w.write_u64::<BE>(s.count)?;
                    w.write_u32::<BE>(s.first.len() as u32)?;
                    w.write_all(&s.first)?;
                    w.write_u32::<BE>(s.last.len() as u32)?;
                    w.write_all(&s.last)?;
                }
            },
        }
        Ok(())
    }
}

fn update_int(slot: &mut Option<IntStats>, v: i64) {
    *slot = Some(match slot.take() {
        None => IntStats {
            count: 1,
            min: v,
            max: v,
            first: v,
            last: v,
            sum: v,
        },
        Some(s) => IntStats {
            count: s.count + 1,
            min: s.min.min(v),
            max: s.max.max(v),
            first: s.first,
            last: v,
            sum: s.sum.wrapping_add(v),
        },
    });
}

fn update_float(slot: &mut Option<FloatStats>, v: f64) {
    *slot = Some(match slot.take() {
        None => FloatStats {
            count: 1,
            min: v,
            max: v,
            first: v,
            last: v,
            sum: v,
        },
        Some(s) => FloatStats {
            count: s.count + 1,
            min: s.min.min(v),
            max: s.max.max(v),
            first: s.first,
            last: v,
            sum: s.sum + v,
        },
    });
}

fn merge_opt<T: Copy>(a: &mut Option<T>, b: &Option<T>, combine: impl FnOnce(T, T) -> T) {
    *a = match (a.take(), *b) {
        (None, rhs) => rhs,
        (Some(a), None) => Some(a),
        (Some(a), Some(b)) => Some(combine(a, b)),
    };
}
