//! Trajectory text format.
//!
//! One grid point per line, whitespace separated: the time instant followed
//! by the vector components in index order. Blank lines are skipped and all
//! other lines must have the same number of fields.
//!
//! ```text
//! 3.0    30.0   31.0
//! 4.0    40.0   41.0
//! 5.0    50.0   51.0
//! ```

use crate::error::MalformedInput;
use crate::Error;

pub(crate) struct Rows<A> {
    pub times: Vec<A>,
    pub values: ndarray::Array2<A>,
}

/// parses the whole input before building anything, so a bad line anywhere
/// fails the entire parse
pub(crate) fn parse<A>(text: &str) -> Result<Rows<A>, Error>
where
    A: std::str::FromStr,
{
    let mut times = Vec::new();
    let mut values = Vec::new();
    let mut num_fields: Option<usize> = None;

    for (i, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }

        let expected = *num_fields.get_or_insert(fields.len());
        if fields.len() != expected {
            return Err(MalformedInput::FieldCount {
                line: i + 1,
                expected,
                found: fields.len(),
            }
            .into());
        }

        for (field, text) in fields.iter().enumerate() {
            let value = text.parse::<A>().map_err(|_| MalformedInput::Number {
                line: i + 1,
                field,
                text: text.to_string(),
            })?;

            if field == 0 {
                times.push(value);
            } else {
                values.push(value);
            }
        }
    }

    let num_fields = num_fields.ok_or(Error::EmptyGrid)?;
    let values = ndarray::Array2::from_shape_vec((times.len(), num_fields - 1), values)?;

    Ok(Rows { times, values })
}

/// textual dump of a trajectory, see [`crate::VariablesGrid::display`]
pub struct Dump<'a, A> {
    pub(crate) times: &'a [A],
    pub(crate) values: ndarray::ArrayView2<'a, A>,
    pub(crate) precision: Option<usize>,
}

impl<'a, A: std::fmt::Display> Dump<'a, A> {
    fn field(&self, f: &mut std::fmt::Formatter<'_>, value: &A) -> std::fmt::Result {
        match self.precision {
            Some(precision) => write!(f, "{:.*}", precision, value),
            None => write!(f, "{}", value),
        }
    }
}

impl<'a, A: std::fmt::Display> std::fmt::Display for Dump<'a, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (t, row) in self.times.iter().zip(self.values.outer_iter()) {
            self.field(f, t)?;
            for v in row.iter() {
                f.write_str("\t")?;
                self.field(f, v)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
