//! Per-backend adjustments applied by the facade.
//!
//! Some storage engines only accept text, some expire entries on their own
//! and some store plain strings better than serialized blobs. The profile of
//! a backend name captures those differences so that every facade-built
//! stack hands its adapter data in a shape it can persist.

use stowage::Step;

/// How the facade adapts its stack to one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    /// Registered adapter the name stands for, if it is an alias.
    pub alias: Option<&'static str>,
    /// Steps appended to the key pipeline.
    pub key_steps: &'static [Step],
    /// Steps appended to the value pipeline.
    pub value_steps: &'static [Step],
    /// The adapter expires entries itself and takes an `expires` setting.
    pub native_expiry: bool,
    /// The value pipeline is dropped when it holds only the default serializer.
    pub plain_values: bool,
}

impl Profile {
    const PLAIN: Profile = Profile {
        alias: None,
        key_steps: &[],
        value_steps: &[],
        native_expiry: false,
        plain_values: false,
    };

    /// Adapter to declare for the backend `name`.
    pub fn adapter<'a>(&self, name: &'a str) -> &'a str {
        self.alias.unwrap_or(name)
    }

    /// Looks up the profile of `name`; unlisted names get no adjustments.
    pub fn of(name: &str) -> Profile {
        match name {
            // text-only columns and documents
            "Sequel" | "ActiveRecord" | "Couch" | "DataMapper" => Profile {
                key_steps: &[Step::Base64],
                value_steps: &[Step::Base64],
                ..Profile::PLAIN
            },
            // utf-8 keys over HTTP
            "Riak" => Profile {
                key_steps: &[Step::Base64],
                ..Profile::PLAIN
            },
            "Memcached" | "MemcachedDalli" | "MemcachedNative" | "Cassandra" | "Redis" => Profile {
                native_expiry: true,
                ..Profile::PLAIN
            },
            "PStore" | "YAML" | "Null" => Profile {
                plain_values: true,
                ..Profile::PLAIN
            },
            "HashFile" => Profile {
                alias: Some("File"),
                key_steps: &[Step::Sha256, Step::Spread],
                ..Profile::PLAIN
            },
            "File" => Profile {
                key_steps: &[Step::Escape],
                ..Profile::PLAIN
            },
            _ => Profile::PLAIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_file_is_an_alias() {
        let profile = Profile::of("HashFile");
        assert_eq!(profile.adapter("HashFile"), "File");
        assert_eq!(profile.key_steps, &[Step::Sha256, Step::Spread]);
    }

    #[test]
    fn text_backends_encode_both_sides() {
        for name in ["Sequel", "ActiveRecord", "Couch", "DataMapper"] {
            let profile = Profile::of(name);
            assert_eq!(profile.adapter(name), name);
            assert_eq!(profile.key_steps, &[Step::Base64]);
            assert_eq!(profile.value_steps, &[Step::Base64]);
        }
        assert!(Profile::of("Riak").value_steps.is_empty());
    }

    #[test]
    fn unlisted_names_are_untouched() {
        let profile = Profile::of("Memory");
        assert!(profile.key_steps.is_empty());
        assert!(!profile.native_expiry && !profile.plain_values);
    }
}
