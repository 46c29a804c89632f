//! Reflection of `layout(...)` declarations in preprocessed GLSL.
//!
//! The grammar recognized here is
//!
//! ```text
//! layout ( ATTRIBUTES ) [MEMORY_QUALIFIER...] QUALIFIER ;
//! layout ( ATTRIBUTES ) [MEMORY_QUALIFIER...] QUALIFIER TYPE [NAME] [{ FIELD; ... }] [INSTANCE] [[ARRAY]]
//! ```
//!
//! with `QUALIFIER` one of `in`, `out`, `uniform` and `buffer`. The first form declares
//! stage-wide settings such as compute work group sizes; the second is an interface
//! variable or block and becomes a `ShaderLayout`.
//!
//! A `flat` interpolation qualifier written after `in`/`out` lands in the type slot,
//! with the real type in the name slot. Such layouts take the instance name as their
//! name and report `flat` as their type.

use std::convert::TryFrom;

use crate::{expression, Defines, LayoutSource, PrepperError, ShaderLayout, ShaderLayoutField};

/// Upper bound on the elements of an interface array with a location.
const MAX_LOCATION_ARRAY: usize = 4096;

const MEMORY_QUALIFIERS: [&str; 5] = ["readonly", "writeonly", "coherent", "volatile", "restrict"];

#[derive(Debug, PartialEq)]
struct Interface<'a> {
    attributes: &'a str,
    qualifier: LayoutSource,
    ty: &'a str,
    name: Option<&'a str>,
    body: Option<&'a str>,
    instance: Option<&'a str>,
    array: Option<&'a str>,
}

#[derive(Debug, PartialEq)]
enum Declaration<'a> {
    Interface(Interface<'a>),
    Global {
        attributes: &'a str,
        qualifier: LayoutSource,
    },
}

struct LayoutScanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LayoutScanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or_else(|| rest.len());
            } else if rest.starts_with("/*") {
                self.pos += rest[2..].find("*/").map_or(rest.len(), |i| i + 4);
            } else if self.peek().map_or(false, char::is_whitespace) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_trivia();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_trivia();
        let rest = self.rest();
        let mut chars = rest.char_indices();

        match chars.next() {
            Some((_, c)) if c.is_alphabetic() || c == '_' => {}
            _ => return None,
        }

        let end = chars
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        Some(&rest[..end])
    }

    /// Raw text up to the next `close`, which is consumed.
    fn until(&mut self, close: char) -> Option<&'a str> {
        let rest = self.rest();
        let end = rest.find(close)?;
        self.pos += end + close.len_utf8();
        Some(&rest[..end])
    }

    fn next_declaration(&mut self) -> Option<Declaration<'a>> {
        loop {
            self.skip_trivia();
            self.peek()?;

            match self.ident() {
                Some("layout") => {
                    let resume = self.pos;
                    if let Some(declaration) = self.declaration() {
                        return Some(declaration);
                    }
                    self.pos = resume;
                }
                Some(_) => {}
                None => self.bump(),
            }
        }
    }

    fn declaration(&mut self) -> Option<Declaration<'a>> {
        if !self.eat('(') {
            return None;
        }
        let attributes = self.until(')')?;

        let mut qualifier = self.ident()?;
        while MEMORY_QUALIFIERS.contains(&qualifier) {
            qualifier = self.ident()?;
        }
        let qualifier = LayoutSource::from_qualifier(qualifier)?;

        if self.eat(';') {
            return Some(Declaration::Global {
                attributes,
                qualifier,
            });
        }

        let ty = self.ident()?;
        let name = self.ident();
        let body = if self.eat('{') {
            Some(self.until('}')?)
        } else {
            None
        };
        let instance = self.ident();
        let array = if self.eat('[') {
            Some(self.until(']')?)
        } else {
            None
        };

        Some(Declaration::Interface(Interface {
            attributes,
            qualifier,
            ty,
            name,
            body,
            instance,
            array,
        }))
    }
}

fn evaluate(value: &str, defines: &Defines) -> Result<f64, PrepperError> {
    expression::evaluate(value, defines).map_err(|cause| {
        log::error!("invalid value for layout {:?}: {}", value, cause);
        PrepperError::ExpressionEvaluation {
            expression: value.to_string(),
            cause,
        }
    })
}

/// `key = value` pairs of a layout qualifier; bare keys such as `std140` are skipped.
fn attribute_pairs(attributes: &str) -> impl Iterator<Item = (&str, &str)> {
    attributes.split(',').filter_map(|attribute| {
        attribute
            .split_once('=')
            .map(|(key, value)| (key.trim(), value.trim()))
    })
}

fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut rest = src;

    while !rest.is_empty() {
        if rest.starts_with("//") {
            rest = &rest[rest.find('\n').unwrap_or_else(|| rest.len())..];
        } else if rest.starts_with("/*") {
            rest = &rest[rest[2..].find("*/").map_or(rest.len(), |i| i + 4)..];
            out.push(' ');
        } else {
            let c = rest.chars().next().unwrap_or(' ');
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

/// Fold every `[expr]` in `dims` to an integer; `[]` is kept unsized.
fn resolve_array_dims(
    dims: &str,
    declaration: &str,
    defines: &Defines,
) -> Result<String, PrepperError> {
    let mut resolved = String::new();
    let mut rest = dims;

    while let Some(start) = rest.find('[') {
        let end = match rest[start..].find(']') {
            Some(len) => start + len,
            None => {
                log::error!("unterminated array size in {:?}", declaration);
                return Err(PrepperError::MalformedDeclaration {
                    declaration: declaration.to_string(),
                });
            }
        };

        let size = rest[start + 1..end].trim();
        if size.is_empty() {
            resolved.push_str("[]");
        } else {
            let size = evaluate(size, defines)? as i64;
            resolved.push('[');
            resolved.push_str(&size.to_string());
            resolved.push(']');
        }

        rest = &rest[end + 1..];
    }

    Ok(resolved)
}

fn split_dims(declarator: &str) -> (&str, &str) {
    match declarator.find('[') {
        Some(i) => (&declarator[..i], &declarator[i..]),
        None => (declarator, ""),
    }
}

fn reflect_fields(body: &str, defines: &Defines) -> Result<Vec<ShaderLayoutField>, PrepperError> {
    let mut fields = Vec::new();

    for declaration in strip_comments(body).split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }

        let malformed = || {
            log::error!("malformed block member {:?}", declaration);
            PrepperError::MalformedDeclaration {
                declaration: declaration.to_string(),
            }
        };

        // `float a, b[2];` declares two members sharing the type
        let mut declarators = declaration.split(',');
        let (head, dims) = split_dims(declarators.next().unwrap_or(""));
        let mut words = head.split_whitespace().rev();
        let (name, ty) = match (words.next(), words.next()) {
            (Some(name), Some(ty)) => (name, ty),
            _ => return Err(malformed()),
        };

        fields.push(ShaderLayoutField {
            ty: ty.to_string(),
            name: format!("{}{}", name, resolve_array_dims(dims, declaration, defines)?),
        });

        for declarator in declarators {
            let (name, dims) = split_dims(declarator);
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed());
            }

            fields.push(ShaderLayoutField {
                ty: ty.to_string(),
                name: format!("{}{}", name, resolve_array_dims(dims, declaration, defines)?),
            });
        }
    }

    Ok(fields)
}

fn reflect_interface(
    interface: &Interface,
    defines: &Defines,
    layouts: &mut Vec<ShaderLayout>,
) -> Result<(), PrepperError> {
    let name = match interface.name {
        Some(name) if interface.ty != "flat" => name,
        _ => interface.instance.unwrap_or(""),
    };
    let mut layout = ShaderLayout::new(interface.ty, name, interface.qualifier);

    if let Some(size) = interface.array.map(str::trim).filter(|size| !size.is_empty()) {
        let count = evaluate(size, defines)? as i64;
        if count < 1 {
            log::warn!("array size {:?} of {} is below one", size, name);
        }
        layout.count = count.max(1) as usize;
    }

    let mut has_location = false;
    for (key, value) in attribute_pairs(interface.attributes) {
        let target = match key {
            "location" => {
                has_location = true;
                &mut layout.location
            }
            "binding" => &mut layout.binding,
            "set" => &mut layout.set,
            "input_attachment_index" => &mut layout.input_attachment,
            _ => continue,
        };
        *target = evaluate(value, defines)? as i32;
    }

    if let Some(body) = interface.body {
        layout.fields = reflect_fields(body, defines)?;
    }

    // An array of locations is reported as one single-location entry per element
    let expanded: Vec<ShaderLayout> = if has_location && layout.count > 1 {
        let count = layout.count;
        let last_location = i32::try_from(count - 1)
            .ok()
            .filter(|_| count <= MAX_LOCATION_ARRAY)
            .and_then(|last| layout.location.checked_add(last));
        if last_location.is_none() {
            log::error!(
                "{} locations starting at {} do not fit {}",
                count,
                layout.location,
                layout.full_name()
            );
            return Err(PrepperError::MalformedDeclaration {
                declaration: format!(
                    "layout({}) {} {} {}",
                    interface.attributes,
                    interface.qualifier,
                    interface.ty,
                    layout.full_name()
                ),
            });
        }

        layout.count = 1;
        (1..count as i32)
            .map(|i| ShaderLayout {
                location: layout.location + i,
                ..layout.clone()
            })
            .collect()
    } else {
        Vec::new()
    };

    layouts.push(layout);
    layouts.extend(expanded);

    Ok(())
}

/// Every interface `layout(...)` declaration in `src`, in source order.
pub fn reflect_layouts(src: &str, defines: &Defines) -> Result<Vec<ShaderLayout>, PrepperError> {
    let mut layouts = Vec::new();
    let mut scanner = LayoutScanner::new(src);

    while let Some(declaration) = scanner.next_declaration() {
        if let Declaration::Interface(interface) = declaration {
            reflect_interface(&interface, defines, &mut layouts)?;
        }
    }

    Ok(layouts)
}

/// `local_size_x/y/z` of the first `layout(...) in;` declaring any of them.
/// Axes which are not given default to 1.
pub fn reflect_work_groups(src: &str, defines: &Defines) -> Result<Option<[u32; 3]>, PrepperError> {
    let mut scanner = LayoutScanner::new(src);

    while let Some(declaration) = scanner.next_declaration() {
        let attributes = match declaration {
            Declaration::Global {
                attributes,
                qualifier: LayoutSource::In,
            } => attributes,
            _ => continue,
        };

        let mut work_groups = [1u32; 3];
        let mut found = false;

        for (key, value) in attribute_pairs(attributes) {
            let axis = match key {
                "local_size_x" => 0,
                "local_size_y" => 1,
                "local_size_z" => 2,
                _ => continue,
            };
            work_groups[axis] = evaluate(value, defines)? as u32;
            found = true;
        }

        if found {
            return Ok(Some(work_groups));
        }
    }

    Ok(None)
}

/// Work group sizes plus layouts of a compute shader. Every layout is reported
/// as a storage buffer.
pub fn reflect_compute_layouts(
    src: &str,
    defines: &Defines,
) -> Result<([u32; 3], Vec<ShaderLayout>), PrepperError> {
    let work_groups = match reflect_work_groups(src, defines)? {
        Some(work_groups) => work_groups,
        None => {
            log::warn!("compute shader does not declare local_size_x/y/z");
            [0; 3]
        }
    };

    let mut layouts = reflect_layouts(src, defines)?;
    for layout in &mut layouts {
        layout.source = LayoutSource::StorageBuffer;
    }

    Ok((work_groups, layouts))
}
