//! Named shader sources, organized in groups.
//!
//! A group has to be registered before sources can be read from it. The sources the
//! stock shaders are assembled from live in the `BUILTIN_GROUP`, which is registered by
//! `import_shader_resources`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::*;

/// The group the stock shader sources are registered under.
pub const BUILTIN_GROUP: &str = "crayon-vector-shaders";

/// Provides the text of named shader sources.
pub trait SourceProvider {
    fn source(&self, name: &str) -> Result<Cow<'static, str>>;
}

type Group = HashMap<String, Cow<'static, str>>;

lazy_static! {
    static ref GROUPS: RwLock<HashMap<String, Group>> = RwLock::new(HashMap::new());
}

fn read() -> RwLockReadGuard<'static, HashMap<String, Group>> {
    GROUPS.read().unwrap_or_else(|err| err.into_inner())
}

fn write() -> RwLockWriteGuard<'static, HashMap<String, Group>> {
    GROUPS.write().unwrap_or_else(|err| err.into_inner())
}

/// Registers the built-in sources. Calling it more than once has no effect.
pub fn import_shader_resources() {
    if Resources::has_group(BUILTIN_GROUP) {
        return;
    }

    Resources::register_group(
        BUILTIN_GROUP,
        vec![
            ("compatibility.glsl", include_str!("glsl/compatibility.glsl")),
            ("generic.glsl", include_str!("glsl/generic.glsl")),
            ("Vector.vert", include_str!("glsl/Vector.vert")),
            ("Vector.frag", include_str!("glsl/Vector.frag")),
        ],
    );

    debug!("Imported the built-in shader resources.");
}

/// A view into one registered group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resources {
    group: String,
}

impl Resources {
    /// Fails with `Error::GroupUndefined` if `group` has not been registered.
    pub fn new<T: Into<String>>(group: T) -> Result<Self> {
        let group = group.into();
        if !Resources::has_group(&group) {
            return Err(Error::GroupUndefined(group));
        }

        Ok(Resources { group })
    }

    /// The built-in group, importing it first if needed.
    pub fn builtin() -> Self {
        import_shader_resources();
        Resources {
            group: BUILTIN_GROUP.to_owned(),
        }
    }

    pub fn has_group(group: &str) -> bool {
        read().contains_key(group)
    }

    /// Registers `files` under `group`, replacing files of the same name.
    pub fn register_group<I, N, S>(group: &str, files: I)
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<Cow<'static, str>>,
    {
        let mut groups = write();
        let entry = groups.entry(group.to_owned()).or_insert_with(HashMap::new);
        for (name, source) in files {
            entry.insert(name.into(), source.into());
        }
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }
}

impl SourceProvider for Resources {
    fn source(&self, name: &str) -> Result<Cow<'static, str>> {
        let groups = read();
        let group = groups
            .get(&self.group)
            .ok_or_else(|| Error::GroupUndefined(self.group.clone()))?;

        group
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SourceUndefined(self.group.clone(), name.to_owned()))
    }
}
