//! Narrow query interface onto the target application's code.
//!
//! The target is an opaque, dynamically loaded unit. The orchestrator never
//! types its classes statically; it only asks a [`ClassLoader`] for a class by
//! name and then inspects declared fields, binds static methods, or constructs
//! an applet-like instance.
//!
//! # Loaders
//!
//! - [`ClassTable`] - in-memory classes backed by Rust closures
//! - [`ManifestClassLoader`] - `*.class.toml` descriptors on a class path,
//!   whose methods spawn programs

mod binder;
mod discovery;
mod manifest;
mod table;

use std::path::Path;
use std::sync::Arc;

use bitflags::bitflags;

use crate::environment::RuntimeEnvironment;
use crate::error::LaunchError;
use crate::window::Applet;

pub use binder::{create_applet, find_main_entrypoint, find_main_method};
pub use discovery::find_base_dir_field;
pub use manifest::{
    ClassDescriptor, FieldDescriptor, ManifestClassLoader, ManifestClassLoaderFactory,
    MethodDescriptor, ProgramDescriptor, descriptor_path,
};
pub use table::{ClassDef, ClassTable};

/// Exact type name of the directory handle the base-dir heuristic looks for.
pub const DIRECTORY_HANDLE_TYPE: &str = "java.io.File";

/// Parameter type of a `main` entry point.
pub const STRING_ARRAY_TYPE: &str = "java.lang.String[]";

/// Return type of procedures.
pub const VOID_TYPE: &str = "void";

bitflags! {
    /// Declared modifiers of a field or method.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const PUBLIC = 1;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
    }
}

impl Modifiers {
    /// Parse lowercase modifier keywords (`private`, `static`, ...).
    pub fn from_keywords<S: AsRef<str>>(keywords: &[S]) -> Result<Self, String> {
        keywords.iter().try_fold(Modifiers::empty(), |acc, keyword| {
            let keyword = keyword.as_ref();
            if keyword.chars().any(|c| c.is_ascii_uppercase()) {
                return Err(format!("unknown modifier '{}'", keyword));
            }
            Modifiers::from_name(&keyword.to_ascii_uppercase())
                .map(|flag| acc | flag)
                .ok_or_else(|| format!("unknown modifier '{}'", keyword))
        })
    }
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Exactly the directory handle type. Subtypes are [`FieldType::Other`].
    File,
    Other(String),
}

impl FieldType {
    pub fn parse(type_name: &str) -> Self {
        if type_name == DIRECTORY_HANDLE_TYPE {
            FieldType::File
        } else {
            FieldType::Other(type_name.to_string())
        }
    }
}

/// A declared member field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: String,
    pub ty: FieldType,
    pub modifiers: Modifiers,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, ty: FieldType, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers,
        }
    }
}

/// Parameter and return types of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub params: Vec<String>,
    pub returns: String,
}

impl MethodSignature {
    /// `void (String[])`, the shape of every entry point.
    pub fn main() -> Self {
        Self {
            params: vec![STRING_ARRAY_TYPE.to_string()],
            returns: VOID_TYPE.to_string(),
        }
    }
}

/// A callable procedure of the target.
///
/// Errors are the target's own and are propagated, never swallowed.
pub trait EntryPoint: Send + Sync {
    fn invoke(&self, args: &[String]) -> anyhow::Result<()>;
}

impl<F> EntryPoint for F
where
    F: Fn(&[String]) -> anyhow::Result<()> + Send + Sync,
{
    fn invoke(&self, args: &[String]) -> anyhow::Result<()> {
        self(args)
    }
}

/// A declared method together with a handle to call it.
#[derive(Clone)]
pub struct MethodHandle {
    pub name: String,
    pub signature: MethodSignature,
    pub modifiers: Modifiers,
    pub entry: Arc<dyn EntryPoint>,
}

impl std::fmt::Debug for MethodHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodHandle")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("modifiers", &self.modifiers)
            .finish_non_exhaustive()
    }
}

/// A resolved class of the target application.
pub trait TargetClass: Send + Sync {
    fn name(&self) -> &str;

    /// Fields in declaration order.
    fn declared_fields(&self) -> Vec<FieldInfo>;

    /// Methods in declaration order.
    fn declared_methods(&self) -> Vec<MethodHandle>;

    /// Override a static field before the target initializes.
    fn set_static_field(&self, field: &str, value: &Path) -> anyhow::Result<()>;

    /// Construct an instance through the public no-argument constructor.
    fn new_instance(&self) -> anyhow::Result<Box<dyn Applet>>;
}

/// Resolves class names within the active code-loading context.
pub trait ClassLoader: Send + Sync {
    /// Fails with [`LaunchError::ClassNotFound`] when nothing matches.
    fn load_class(&self, name: &str) -> Result<Arc<dyn TargetClass>, LaunchError>;
}

/// Builds the code-loading context once the runtime environment is known.
pub trait ClassLoaderFactory: Send + Sync {
    fn create(&self, env: &RuntimeEnvironment) -> Result<Arc<dyn ClassLoader>, LaunchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_from_keywords() {
        let mods = Modifiers::from_keywords(&["private", "static"]).unwrap();
        assert_eq!(mods, Modifiers::PRIVATE | Modifiers::STATIC);
        assert!(!mods.contains(Modifiers::FINAL));
    }

    #[test]
    fn test_modifiers_from_keywords_empty() {
        let none: [&str; 0] = [];
        assert_eq!(Modifiers::from_keywords(&none).unwrap(), Modifiers::empty());
    }

    #[test]
    fn test_modifiers_from_keywords_invalid() {
        assert!(Modifiers::from_keywords(&["volatile"]).is_err());
        assert!(Modifiers::from_keywords(&["PRIVATE"]).is_err());
    }

    #[test]
    fn test_field_type_exact_match_only() {
        assert_eq!(FieldType::parse("java.io.File"), FieldType::File);
        assert_eq!(
            FieldType::parse("com.example.BetterFile"),
            FieldType::Other("com.example.BetterFile".to_string())
        );
        assert!(matches!(FieldType::parse("java.io.file"), FieldType::Other(_)));
    }

    #[test]
    fn test_closure_is_an_entry_point() {
        let entry: Arc<dyn EntryPoint> = Arc::new(|args: &[String]| {
            anyhow::ensure!(args.len() == 1, "expected one argument");
            Ok(())
        });
        assert!(entry.invoke(&["a".to_string()]).is_ok());
        assert!(entry.invoke(&[]).is_err());
    }
}
