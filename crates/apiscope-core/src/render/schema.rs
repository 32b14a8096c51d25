use crate::error::RenderError;
use crate::parse::components::{Components, schema_ref_name};
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

const INDENT: &str = "  ";
const ANY: &str = "any";

/// Renders schemas as an indented, JSON-like outline:
///
/// ```text
/// {
///   "id"*: integer<int64>,
///   "tags": [
///     string
///   ]
/// }
/// ```
///
/// `*` marks required properties. With a components table, local `$ref`s are
/// expanded in place; a reference that re-enters itself on the current path is
/// reported as [`RenderError::CyclicSchema`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRenderer<'a> {
    components: Option<&'a Components>,
}

impl<'a> SchemaRenderer<'a> {
    pub fn new(components: Option<&'a Components>) -> Self {
        Self { components }
    }

    /// Render `schema` at `depth`, marking properties listed in `required`
    /// unless the object declares its own `required`.
    pub fn render(
        &self,
        schema: Option<&SchemaOrRef>,
        depth: usize,
        required: &[String],
    ) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut refs = Vec::new();
        self.write(&mut out, schema, depth, required, &mut refs)?;
        Ok(out)
    }

    fn write(
        &self,
        out: &mut String,
        schema: Option<&SchemaOrRef>,
        depth: usize,
        required: &[String],
        refs: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        match schema {
            None => out.push_str(ANY),
            Some(SchemaOrRef::Schema(s)) => self.write_schema(out, s, depth, required, refs)?,
            Some(SchemaOrRef::Ref { ref_path }) => {
                let Some(components) = self.components else {
                    out.push_str(schema_ref_name(ref_path).unwrap_or(ref_path));
                    return Ok(());
                };
                if refs.iter().any(|r| r == ref_path) {
                    return Err(RenderError::CyclicSchema(ref_path.clone()));
                }
                let target = components
                    .schema(ref_path)
                    .ok_or_else(|| RenderError::UnresolvedRef(ref_path.clone()))?;

                refs.push(ref_path.clone());
                let result = self.write(out, Some(target), depth, required, refs);
                refs.pop();
                result?;
            }
        }
        Ok(())
    }

    fn write_schema(
        &self,
        out: &mut String,
        schema: &Schema,
        depth: usize,
        required: &[String],
        refs: &mut Vec<String>,
    ) -> Result<(), RenderError> {
        let indent = INDENT.repeat(depth);

        if schema.is_type(SchemaType::Object) && !schema.properties.is_empty() {
            let required_fields = schema.required.as_deref().unwrap_or(required);
            let last = schema.properties.len() - 1;

            out.push_str("{\n");
            for (idx, (name, prop)) in schema.properties.iter().enumerate() {
                let mark = if required_fields.contains(name) { "*" } else { "" };
                out.push_str(&format!("{indent}{INDENT}\"{name}\"{mark}: "));

                match leaf(prop) {
                    Some(leaf) => out.push_str(&leaf),
                    None => self.write(out, Some(prop), depth + 1, required_fields, refs)?,
                }

                if idx < last {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str(&indent);
            out.push('}');
            return Ok(());
        }

        if let Some(items) = schema.items.as_deref().filter(|_| schema.is_type(SchemaType::Array)) {
            out.push_str(&format!("[\n{indent}{INDENT}"));
            self.write(out, Some(items), depth + 1, &[], refs)?;
            out.push_str(&format!("\n{indent}]"));
            return Ok(());
        }

        match &schema.schema_type {
            Some(ts) => out.push_str(&ts.to_string()),
            None => out.push_str(ANY),
        }
        Ok(())
    }
}

/// A property rendered inline: typed, and neither an object nor an array.
fn leaf(prop: &SchemaOrRef) -> Option<String> {
    let schema = prop.as_schema()?;
    let ts = schema.schema_type.as_ref()?;
    if ts.is(SchemaType::Object) || ts.is(SchemaType::Array) {
        return None;
    }
    Some(match &schema.format {
        Some(format) => format!("{ts}<{format}>"),
        None => ts.to_string(),
    })
}

/// Render without a components table. References print as their target name,
/// so this never fails.
pub fn render_schema(schema: Option<&SchemaOrRef>, depth: usize) -> String {
    SchemaRenderer::default()
        .render(schema, depth, &[])
        .unwrap_or_else(|err| err.to_string())
}
