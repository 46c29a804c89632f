use regex::Regex;

use crate::{expression, DefineValue, Defines, PrepperError, SourceChunk};

lazy_static::lazy_static! {
    static ref DIRECTIVE_RE: Regex = Regex::new(r"^#\s*([a-z]+)\b\s*(.*)$").unwrap();
    static ref DEFINE_RE: Regex = Regex::new(r"^(\w+)(?:\s+(.*))?$").unwrap();
    static ref DEFINED_RE: Regex =
        Regex::new(r"^(!?)\s*defined(?:\s*\(\s*(\w+)\s*\)|\s+(\w+))$").unwrap();
    static ref COMPARISON_RE: Regex = Regex::new(r"^(.+?)(==|!=|<=|>=|<|>)(.+)$").unwrap();
    static ref ARITHMETIC_RE: Regex = Regex::new(r"^[\w\s.+\-*/]+$").unwrap();
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Directive<'l> {
    Define(&'l str),
    Undef(&'l str),
    If(&'l str),
    Ifdef(&'l str),
    Ifndef(&'l str),
    Elif(&'l str),
    Else,
    Endif,
    // `#version`, `#extension`, `#pragma` and friends go to the compiler
    Other,
}

impl<'l> Directive<'l> {
    fn parse(line: &'l str) -> Option<Self> {
        if !line.starts_with('#') {
            return None;
        }

        let text = directive_text(line);
        let captures = match DIRECTIVE_RE.captures(text) {
            Some(captures) => captures,
            None => return Some(Directive::Other),
        };
        let args = captures.get(2).map_or("", |m| m.as_str());
        let first_word = args.split_whitespace().next().unwrap_or("");

        Some(match &captures[1] {
            "define" => Directive::Define(args),
            "undef" => Directive::Undef(first_word),
            "if" => Directive::If(args),
            "ifdef" => Directive::Ifdef(first_word),
            "ifndef" => Directive::Ifndef(first_word),
            "elif" => Directive::Elif(args),
            "else" => Directive::Else,
            "endif" => Directive::Endif,
            _ => Directive::Other,
        })
    }
}

/// Directive arguments never include trailing `//` comments or a continuation backslash.
fn directive_text(line: &str) -> &str {
    let code = match line.find("//") {
        Some(i) => &line[..i],
        None => line,
    };
    let code = code.trim_end();
    code.strip_suffix('\\').unwrap_or(code).trim()
}

struct Frame {
    enabled: bool,
    any_branch_taken: bool,
    file: String,
    line: usize,
}

/// Conditional compilation and object-like macros over import-resolved source.
///
/// Lines are processed one at a time against a stack of `#if` frames. Defines found
/// along the way are added to the table passed to `new`, and after the last line every
/// valued define is substituted once, as a whole word, into the surviving code.
pub struct Preprocessor {
    defines: Defines,
    frames: Vec<Frame>,
    continued_define: Option<String>,
    output: String,
}

impl Preprocessor {
    pub fn new(defines: Defines) -> Self {
        Self {
            defines,
            frames: vec![Frame {
                enabled: true,
                any_branch_taken: true,
                file: String::new(),
                line: 0,
            }],
            continued_define: None,
            output: String::new(),
        }
    }

    /// Returns the preprocessed source along with the final define table.
    pub fn process(
        mut self,
        chunks: &[SourceChunk],
    ) -> Result<(String, Defines), PrepperError> {
        for chunk in chunks {
            for (line_number, line) in chunk.numbered_lines() {
                self.process_line(&chunk.file, line_number, line)?;
            }
        }

        if self.frames.len() > 1 {
            let frame = &self.frames[self.frames.len() - 1];
            log::error!("unterminated conditional in {} ({})", frame.file, frame.line);
            return Err(PrepperError::UnterminatedConditional {
                file: frame.file.clone(),
                line: frame.line,
            });
        }

        Ok(self.substitute_defines())
    }

    fn enabled(&self) -> bool {
        self.frames.last().map_or(false, |frame| frame.enabled)
    }

    fn parent_enabled(&self) -> bool {
        self.frames.len() > 1 && self.frames[self.frames.len() - 2].enabled
    }

    fn process_line(
        &mut self,
        file: &str,
        line_number: usize,
        raw: &str,
    ) -> Result<(), PrepperError> {
        let line = raw.trim();
        if line.starts_with("//") {
            return Ok(());
        }

        if let Some(name) = self.continued_define.take() {
            self.continue_define(name, line);
            return Ok(());
        }

        let directive = Directive::parse(line);

        match directive {
            Some(Directive::If(condition)) => {
                let enabled = self.enabled() && self.condition(condition, line)?;
                self.push_frame(enabled, file, line_number);
                return Ok(());
            }
            Some(Directive::Ifdef(name)) => {
                let enabled = self.enabled() && self.defines.contains(name);
                self.push_frame(enabled, file, line_number);
                return Ok(());
            }
            Some(Directive::Ifndef(name)) => {
                let enabled = self.enabled() && !self.defines.contains(name);
                self.push_frame(enabled, file, line_number);
                return Ok(());
            }
            Some(Directive::Elif(condition)) => {
                self.check_open("elif", file, line_number)?;
                let eligible = self.parent_enabled() && !self.top().any_branch_taken;
                let enabled = eligible && self.condition(condition, line)?;
                self.set_branch(enabled);
                return Ok(());
            }
            Some(Directive::Else) => {
                self.check_open("else", file, line_number)?;
                let enabled = self.parent_enabled() && !self.top().any_branch_taken;
                self.set_branch(enabled);
                return Ok(());
            }
            Some(Directive::Endif) => {
                self.check_open("endif", file, line_number)?;
                let _ = self.frames.pop();
                return Ok(());
            }
            _ => {}
        }

        if !self.enabled() {
            return Ok(());
        }

        match directive {
            Some(Directive::Define(args)) => self.define(args, line.ends_with('\\'), line)?,
            Some(Directive::Undef(name)) => {
                log::trace!("undefining {}", name);
                let _ = self.defines.remove(name);
            }
            _ if !line.is_empty() => {
                self.output.push_str(raw);
                self.output.push('\n');
            }
            _ => {}
        }

        Ok(())
    }

    fn top(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn push_frame(&mut self, enabled: bool, file: &str, line: usize) {
        self.frames.push(Frame {
            enabled,
            any_branch_taken: enabled,
            file: file.to_string(),
            line,
        });
    }

    fn set_branch(&mut self, enabled: bool) {
        if let Some(frame) = self.frames.last_mut() {
            frame.enabled = enabled;
            frame.any_branch_taken |= enabled;
        }
    }

    fn check_open(&self, directive: &str, file: &str, line: usize) -> Result<(), PrepperError> {
        if self.frames.len() > 1 {
            return Ok(());
        }

        log::error!("#{} without a matching #if in {} ({})", directive, file, line);
        Err(PrepperError::UnmatchedDirective {
            directive: directive.to_string(),
            file: file.to_string(),
            line,
        })
    }

    /// `||` of `&&` of terms. A term is `[!]defined(NAME)`, a comparison of two
    /// arithmetic expressions, or an arithmetic expression where non-zero is true.
    fn condition(&self, condition: &str, line: &str) -> Result<bool, PrepperError> {
        let mut any = false;
        for alternative in condition.split("||") {
            let mut all = true;
            for term in alternative.split("&&") {
                all &= self.condition_term(term, line)?;
            }
            any |= all;
        }
        Ok(any)
    }

    fn condition_term(&self, term: &str, line: &str) -> Result<bool, PrepperError> {
        let mut term = term.trim();
        if term.starts_with('(') && term.ends_with(')') {
            term = term[1..term.len() - 1].trim();
        }

        if let Some(captures) = DEFINED_RE.captures(term) {
            let name = captures
                .get(2)
                .or_else(|| captures.get(3))
                .map_or("", |m| m.as_str());
            let negated = &captures[1] == "!";
            return Ok(self.defines.contains(name) != negated);
        }

        if let Some(captures) = COMPARISON_RE.captures(term) {
            let lhs = self.fold(&captures[1], line)?;
            let rhs = self.fold(&captures[3], line)?;
            return Ok(match &captures[2] {
                "==" => lhs == rhs,
                "!=" => lhs != rhs,
                "<=" => lhs <= rhs,
                ">=" => lhs >= rhs,
                "<" => lhs < rhs,
                _ => lhs > rhs,
            });
        }

        Ok(self.fold(term, line)? != 0.0)
    }

    fn fold(&self, expression: &str, line: &str) -> Result<f64, PrepperError> {
        expression::evaluate(expression, &self.defines).map_err(|cause| {
            log::error!("error processing condition {:?}: {}", line, cause);
            PrepperError::ExpressionEvaluation {
                expression: line.to_string(),
                cause,
            }
        })
    }

    fn define(&mut self, args: &str, continues: bool, line: &str) -> Result<(), PrepperError> {
        let captures = match DEFINE_RE.captures(args) {
            Some(captures) => captures,
            None => {
                log::warn!("ignoring malformed define {:?}", line);
                return Ok(());
            }
        };

        let name = &captures[1];
        let value = captures.get(2).map_or("", |m| m.as_str()).trim();

        let value = match DefineValue::from_literal(value) {
            DefineValue::Text(text)
                if expression::contains_operator(&text) && ARITHMETIC_RE.is_match(&text) =>
            {
                let number = expression::evaluate(&text, &self.defines).map_err(|cause| {
                    log::error!("error processing equation {:?}: {}", line, cause);
                    PrepperError::ExpressionEvaluation {
                        expression: line.to_string(),
                        cause,
                    }
                })?;
                DefineValue::Number(number)
            }
            value => value,
        };

        log::trace!("#define {} {:?}", name, value);
        self.defines.set(name, value);

        if continues {
            self.continued_define = Some(name.to_string());
        }

        Ok(())
    }

    fn continue_define(&mut self, name: String, line: &str) {
        let text = directive_text(line);

        let value = match self.defines.get(&name) {
            Some(DefineValue::Text(s)) => format!("{}\n{}", s, text),
            Some(DefineValue::Number(n)) => format!("{}\n{}", n, text),
            Some(DefineValue::Flag) | None => text.to_string(),
        };
        self.defines.set(&name, DefineValue::Text(value));

        if line.ends_with('\\') {
            self.continued_define = Some(name);
        }
    }

    fn substitute_defines(self) -> (String, Defines) {
        let mut src = self.output;

        for (name, value) in self.defines.iter() {
            let replacement = match value.substitution() {
                Some(replacement) => replacement,
                None => continue,
            };

            match Regex::new(&format!(r"\b{}\b", regex::escape(name))) {
                Ok(re) => {
                    src = re
                        .replace_all(&src, regex::NoExpand(&replacement))
                        .into_owned();
                }
                Err(e) => log::warn!("cannot substitute define {:?}: {}", name, e),
            }
        }

        (src, self.defines)
    }
}
