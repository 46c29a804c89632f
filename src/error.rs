use crate::expression::ExpressionError;

pub type BoxedIncludeProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PrepperError {
    /// Any error reported by the `IncludeProvider` while reading the entry file or an include
    #[error("failed to read {file:?}: {cause}")]
    FileReadError {
        file: String,
        cause: BoxedIncludeProviderError,
    },

    /// Recursively included file, along with information about where it was encountered
    #[error("file {file:?} is recursively included; triggered in {from:?} ({from_line:?})")]
    RecursiveInclude {
        /// File which was included recursively
        file: String,

        /// File which included the recursively included one
        from: String,

        /// Line in the `from` file on which the include happened
        from_line: usize,
    },

    /// `#else`, `#elif` or `#endif` without a matching `#if`
    #[error("#{directive} without a matching #if: {file:?} ({line:?})")]
    UnmatchedDirective {
        directive: String,
        file: String,
        line: usize,
    },

    /// An `#if` family directive still open at the end of the source
    #[error("unterminated conditional opened at {file:?} ({line:?})")]
    UnterminatedConditional { file: String, line: usize },

    /// Arithmetic in a define, conditional, array size or layout attribute failed
    #[error("failed to evaluate {expression:?}: {cause}")]
    ExpressionEvaluation {
        expression: String,
        cause: ExpressionError,
    },

    /// A struct field inside a layout block which is not `TYPE NAME`
    #[error("malformed declaration: {declaration:?}")]
    MalformedDeclaration { declaration: String },
}
