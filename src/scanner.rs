use std::collections::HashSet;

use regex::Regex;

use crate::{IncludeProvider, PrepperError, ResolvedIncludePath, SourceChunk};

lazy_static::lazy_static! {
    static ref INCLUDE_RE: Regex = Regex::new(r#"^\s*#\s*include\s*(?:"([^"]+)"|<([^>]+)>)"#).unwrap();
}

/// Line-oriented include crawler. Every well-formed `#include` line is replaced
/// by the chunks of the included file; all other lines are kept as they are.
pub struct Scanner<'a, 'b, 'c> {
    include_provider: &'b mut dyn IncludeProvider,
    input: &'a str,
    this_file: ResolvedIncludePath,
    prior_includes: &'c mut HashSet<ResolvedIncludePath>,
    chunks: Vec<SourceChunk>,
    current_chunk: String,
    current_chunk_first_line: usize,
}

impl<'a, 'b, 'c> Scanner<'a, 'b, 'c> {
    pub fn new(
        input: &'a str,
        this_file: ResolvedIncludePath,
        prior_includes: &'c mut HashSet<ResolvedIncludePath>,
        include_provider: &'b mut dyn IncludeProvider,
    ) -> Scanner<'a, 'b, 'c> {
        Scanner {
            include_provider,
            input,
            this_file,
            prior_includes,
            chunks: Vec::new(),
            current_chunk: String::new(),
            current_chunk_first_line: 1,
        }
    }

    pub fn into_chunks(self) -> Vec<SourceChunk> {
        self.chunks
    }

    fn flush_current_chunk(&mut self, next_line: usize) {
        if !self.current_chunk.is_empty() {
            self.chunks.push(SourceChunk {
                file: self.this_file.0.clone(),
                line_offset: self.current_chunk_first_line - 1,
                source: std::mem::take(&mut self.current_chunk),
            });
        }

        self.current_chunk_first_line = next_line;
    }

    pub fn include_child(
        &mut self,
        path: &ResolvedIncludePath,
        included_on_line: usize,
    ) -> Result<(), PrepperError> {
        if self.prior_includes.contains(path) {
            log::error!(
                "{} is recursively included from {} ({})",
                path.0,
                self.this_file.0,
                included_on_line
            );
            return Err(PrepperError::RecursiveInclude {
                file: path.0.clone(),
                from: self.this_file.0.clone(),
                from_line: included_on_line,
            });
        }

        self.flush_current_chunk(included_on_line + 1);

        let child_code = self.include_provider.get_include(path).map_err(|e| {
            log::error!("failed to load include file {}: {}", path.0, e);
            PrepperError::FileReadError {
                file: path.0.clone(),
                cause: e,
            }
        })?;

        log::trace!("including {} ({} bytes)", path.0, child_code.len());
        self.prior_includes.insert(path.clone());

        self.chunks.append(&mut {
            let mut child_scanner = Scanner::new(
                &child_code,
                path.clone(),
                self.prior_includes,
                self.include_provider,
            );
            child_scanner.process_input()?;
            child_scanner.chunks
        });

        self.prior_includes.remove(path);

        Ok(())
    }

    pub fn process_input(&mut self) -> Result<(), PrepperError> {
        let input = self.input;

        for (i, line) in input.lines().enumerate() {
            let line_number = i + 1;

            let requested = INCLUDE_RE
                .captures(line)
                .and_then(|captures| captures.get(1).or_else(|| captures.get(2)))
                .map(|m| m.as_str().trim());

            match requested {
                Some(requested) if !requested.is_empty() => {
                    let resolved = self
                        .include_provider
                        .resolve_path(requested, &self.this_file)
                        .map_err(|e| {
                            log::error!("failed to resolve include {}: {}", requested, e);
                            PrepperError::FileReadError {
                                file: requested.to_string(),
                                cause: e,
                            }
                        })?;
                    self.include_child(&resolved, line_number)?;
                }
                _ => {
                    self.current_chunk.push_str(line);
                    self.current_chunk.push('\n');
                }
            }
        }

        let end = input.lines().count() + 1;
        self.flush_current_chunk(end);
        Ok(())
    }
}
