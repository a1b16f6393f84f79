//! The recursive walk that writes resolved values into a target.
//!
//! `index` selects which element of a multi-value sequence a scalar leaf
//! reads. It is nonzero only for the elements of a list filled from one
//! multi-value path (`--tag a --tag b`); every struct field starts again at 0.

use tracing::debug;

use crate::coerce::coerce;
use crate::error::PathfigError;
use crate::loader::Loader;
use crate::path::{field_tag, indexed, join};
use crate::target::{Field, Populate, Shape};

pub(crate) fn populate(
    loader: &Loader,
    path: &str,
    target: &mut dyn Populate,
    index: usize,
) -> Result<(), PathfigError> {
    match target.shape() {
        Shape::Optional(optional) => populate(loader, path, optional.get_or_init(), index),

        Shape::Struct(fields) => fields.visit_fields(&mut |field: Field, value: &mut dyn Populate| {
            let field_path = match field.tag {
                Some(tag) => join(path, tag),
                None if field.flatten => path.to_string(),
                None => join(path, &field_tag(field.name)),
            };
            populate(loader, &field_path, value, 0)
        }),

        Shape::Sequence(seq) => {
            let len = loader.resolve_path_len(path)?;
            if len > 0 {
                seq.reset(len);
                for i in 0..len {
                    populate(loader, &indexed(path, i), seq.element(i), 0)?;
                }
                return Ok(());
            }

            match loader.resolve_value(path)? {
                Some(values) => {
                    seq.reset(values.len());
                    for i in 0..values.len() {
                        populate(loader, path, seq.element(i), i)?;
                    }
                }
                None => seq.reset(0),
            }
            Ok(())
        }

        Shape::Scalar(slot) => {
            let Some(value) = loader
                .resolve_value(path)?
                .and_then(|values| values.get(index))
            else {
                return Ok(());
            };
            let kind = slot.kind();
            let stored = coerce(value, kind).is_some_and(|scalar| slot.store(scalar));
            if !stored {
                debug!(
                    path,
                    index,
                    value = %value,
                    source_type = value.type_name(),
                    target = ?kind,
                    "value not coercible, keeping existing"
                );
            }
            Ok(())
        }

        Shape::Unsupported(kind) => Err(PathfigError::UnsupportedTarget {
            path: path.to_string(),
            kind,
        }),
    }
}
