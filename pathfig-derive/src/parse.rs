//! Attribute parsing for the Populate derive macro.
//!
//! Handles `#[config(...)]` attributes on struct fields.

use syn::{Attribute, Error, Field, Ident, LitStr, Result};

/// Parsed `#[config(...)]` options for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub name: Option<String>,
    pub flatten: bool,
    pub skip: bool,
}

/// A named field together with its parsed options.
pub struct ParsedField {
    pub ident: Ident,
    pub options: FieldOptions,
}

impl ParsedField {
    /// Declared field name, without the `r#` prefix of raw identifiers.
    pub fn declared_name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_string(),
            None => name,
        }
    }
}

/// Parse every `#[config(...)]` attribute on a field.
pub fn parse_field(field: &Field) -> Result<ParsedField> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "Populate requires named fields"))?;

    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("config")) {
        parse_config_attr(attr, &mut options)?;
    }

    if options.skip && (options.flatten || options.name.is_some()) {
        return Err(Error::new_spanned(
            &ident,
            "skip cannot be combined with name or flatten",
        ));
    }

    Ok(ParsedField { ident, options })
}

fn parse_config_attr(attr: &Attribute, options: &mut FieldOptions) -> Result<()> {
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            let value = lit.value();
            if value.is_empty() {
                return Err(Error::new(lit.span(), "name cannot be empty"));
            }
            options.name = Some(value);
            Ok(())
        } else if meta.path.is_ident("flatten") {
            options.flatten = true;
            Ok(())
        } else if meta.path.is_ident("skip") {
            options.skip = true;
            Ok(())
        } else if meta.path.is_ident("rename") || meta.path.is_ident("tag") {
            Err(meta.error("unknown config attribute; did you mean `name = \"...\"`?"))
        } else {
            Err(meta.error("unknown config attribute; expected `name`, `flatten`, or `skip`"))
        }
    })
}
