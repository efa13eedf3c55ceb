use crate::codec::size::check_limit;
use crate::internal::error::{Error, Result};

/// Default ceiling on nested STRUCT/MAP/SET/LIST levels.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Ceilings applied while skipping untrusted input.
///
/// Every composite value entered counts one level of depth. Container sizes
/// and string lengths are checked after sign validation and before any
/// element or payload byte is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipLimits {
    pub max_depth: usize,
    pub max_container_size: Option<usize>,
    pub max_string_len: Option<usize>,
}

impl Default for SkipLimits {
    fn default() -> Self {
        SkipLimits {
            max_depth: DEFAULT_MAX_DEPTH,
            max_container_size: None,
            max_string_len: None,
        }
    }
}

impl SkipLimits {
    /// Limits with no size ceilings and the given depth ceiling.
    pub fn with_max_depth(max_depth: usize) -> Self {
        SkipLimits { max_depth, ..Default::default() }
    }

    pub fn max_container_size(mut self, limit: usize) -> Self {
        self.max_container_size = Some(limit);
        self
    }

    pub fn max_string_len(mut self, limit: usize) -> Self {
        self.max_string_len = Some(limit);
        self
    }

    /// Steps one level into a composite value, returning the new depth.
    pub(crate) fn descend(&self, depth: usize) -> Result<usize> {
        let next = depth + 1;
        if next > self.max_depth {
            tracing::debug!(depth = next, limit = self.max_depth, "nesting depth limit exceeded");
            return Err(Error::DepthLimit(self.max_depth));
        }
        Ok(next)
    }

    pub(crate) fn check_container_size(&self, size: usize) -> Result<usize> {
        check_limit(size, self.max_container_size).inspect_err(|_| {
            tracing::debug!(size, limit = ?self.max_container_size, "container size limit exceeded");
        })
    }

    pub(crate) fn check_string_len(&self, len: usize) -> Result<usize> {
        check_limit(len, self.max_string_len).inspect_err(|_| {
            tracing::debug!(len, limit = ?self.max_string_len, "string length limit exceeded");
        })
    }
}
