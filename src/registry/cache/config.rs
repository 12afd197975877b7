// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Cache configuration options

/// Configuration for operation lookup caching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries per lookup cache, 0 for unbounded
    pub lookup_cache_size: usize,

    /// Whether lookup results are cached at all
    pub enable_caching: bool,
}

impl CacheConfig {
    /// Create a new cache configuration with custom settings
    pub fn new(lookup_cache_size: usize, enable_caching: bool) -> Self {
        Self {
            lookup_cache_size,
            enable_caching,
        }
    }

    /// Create a configuration whose caches hold at most `capacity` entries
    pub fn bounded(capacity: usize) -> Self {
        Self::new(capacity, true)
    }

    /// Create a configuration with caching disabled
    ///
    /// Every lookup recomputes its result by scanning the registered operations.
    pub fn disabled() -> Self {
        Self::new(0, false)
    }

    /// Create a configuration for testing
    pub fn testing() -> Self {
        Self::new(16, true)
    }

    /// Check if the caches have a capacity limit
    pub fn is_bounded(&self) -> bool {
        self.lookup_cache_size > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        // Keys are bounded by the number of type pairs, so no limit is needed
        Self::new(0, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.lookup_cache_size, 0);
        assert!(config.enable_caching);
        assert!(!config.is_bounded());
    }

    #[test]
    fn test_cache_config_bounded() {
        let config = CacheConfig::bounded(500);
        assert_eq!(config.lookup_cache_size, 500);
        assert!(config.enable_caching);
        assert!(config.is_bounded());
    }

    #[test]
    fn test_cache_config_disabled() {
        let config = CacheConfig::disabled();
        assert!(!config.enable_caching);
        assert!(!config.is_bounded());
    }

    #[test]
    fn test_cache_config_testing() {
        let config = CacheConfig::testing();
        assert_eq!(config.lookup_cache_size, 16);
        assert!(config.enable_caching);
    }
}
