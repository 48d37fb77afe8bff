use std::fmt;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::*;

bitflags! {
    /// Optional features of the vector shader.
    pub struct Flags: u8 {
        /// Transforms the texture coordinates with a texture matrix.
        const TEXTURE_TRANSFORMATION = 1 << 0;
        /// Feeds per-draw parameters through uniform buffer blocks instead of
        /// individual uniforms.
        const UNIFORM_BUFFERS = 1 << 1;
        /// Indexes the uniform buffers with the draw ID of a multi-draw call. Implies
        /// `UNIFORM_BUFFERS`.
        const MULTI_DRAW = Self::UNIFORM_BUFFERS.bits | (1 << 2);
    }
}

// Supersets come before their subsets so `MULTI_DRAW` swallows `UNIFORM_BUFFERS`.
const NAMES: [(Flags, &str); 3] = [
    (Flags::TEXTURE_TRANSFORMATION, "TextureTransformation"),
    (Flags::MULTI_DRAW, "MultiDraw"),
    (Flags::UNIFORM_BUFFERS, "UniformBuffers"),
];

impl Flags {
    /// The names of the flags in the set. A superset flag is listed instead of the
    /// flags it implies.
    pub fn names(self) -> Vec<&'static str> {
        let mut remaining = self;
        let mut names = Vec::new();
        for &(flag, name) in &NAMES {
            if remaining.contains(flag) {
                names.push(name);
                remaining.remove(flag);
            }
        }

        names
    }

    pub fn from_name(name: &str) -> Option<Flags> {
        NAMES.iter().find(|(_, v)| *v == name).map(|(flag, _)| *flag)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Flags{{}}");
        }

        write!(f, "{}", self.names().join("|"))
    }
}

impl Serialize for Flags {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for Flags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> ::std::result::Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;

        let mut flags = Flags::empty();
        for name in names {
            match Flags::from_name(&name) {
                Some(v) => flags |= v,
                None => {
                    return Err(de::Error::custom(format!("unknown flag '{}'", name)));
                }
            }
        }

        Ok(flags)
    }
}

/// Selects a variant of the vector shader. The dimension count is part of the shader
/// type instead.
///
/// Material and draw counts only matter with `Flags::UNIFORM_BUFFERS`, in which case
/// they size the uniform block arrays and must not be zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    flags: Flags,
    material_count: u32,
    draw_count: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            flags: Flags::empty(),
            material_count: 1,
            draw_count: 1,
        }
    }
}

impl Configuration {
    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_material_count(mut self, count: u32) -> Self {
        self.material_count = count;
        self
    }

    pub fn with_draw_count(mut self, count: u32) -> Self {
        self.draw_count = count;
        self
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        self.flags
    }

    #[inline]
    pub fn material_count(&self) -> u32 {
        self.material_count
    }

    #[inline]
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    /// Parses a JSON array of configurations, e.g. a list of variants to precompile at
    /// startup.
    ///
    /// ```rust
    /// use crayon_vector::prelude::*;
    ///
    /// let list = Configuration::parse_list(
    ///     r#"[{}, {"flags": ["MultiDraw"], "draw_count": 16, "material_count": 4}]"#,
    /// ).unwrap();
    ///
    /// assert_eq!(list[0], Configuration::default());
    /// assert!(list[1].flags().contains(Flags::UNIFORM_BUFFERS));
    /// ```
    pub fn parse_list(json: &str) -> Result<Vec<Configuration>> {
        let list = serde_json::from_str(json)?;
        Ok(list)
    }
}
