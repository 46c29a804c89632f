use std::path::Path;

use crate::BoxedIncludeProviderError;

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ResolvedIncludePath(pub String);

/// User-supplied include reader
pub trait IncludeProvider {
    /// Turn the path written in an `#include` directive into one `get_include` understands.
    /// `includer` is the resolved path of the file containing the directive.
    fn resolve_path(
        &self,
        path: &str,
        includer: &ResolvedIncludePath,
    ) -> Result<ResolvedIncludePath, BoxedIncludeProviderError>;

    fn get_include(
        &mut self,
        path: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError>;
}

/// Reads shaders from disk. Includes are looked up next to the file which includes them.
#[derive(Default)]
pub struct FileIncludeProvider;

impl IncludeProvider for FileIncludeProvider {
    fn resolve_path(
        &self,
        path: &str,
        includer: &ResolvedIncludePath,
    ) -> Result<ResolvedIncludePath, BoxedIncludeProviderError> {
        let dir = Path::new(&includer.0).parent().unwrap_or_else(|| Path::new(""));
        Ok(ResolvedIncludePath(
            dir.join(path).to_string_lossy().into_owned(),
        ))
    }

    fn get_include(
        &mut self,
        path: &ResolvedIncludePath,
    ) -> Result<String, BoxedIncludeProviderError> {
        Ok(std::fs::read_to_string(&path.0)?)
    }
}
