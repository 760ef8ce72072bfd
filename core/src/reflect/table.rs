//! In-memory class table.
//!
//! Lets an embedder (or a test) expose Rust closures as target classes
//! without any code on disk.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use crate::environment::RuntimeEnvironment;
use crate::error::LaunchError;
use crate::window::Applet;

use super::{
    ClassLoader, ClassLoaderFactory, EntryPoint, FieldInfo, FieldType, MethodHandle,
    MethodSignature, Modifiers, TargetClass,
};
use super::binder::MAIN_METHOD;

type AppletConstructor = Arc<dyn Fn() -> anyhow::Result<Box<dyn Applet>> + Send + Sync>;

/// Definition of one in-memory class.
#[derive(Clone)]
pub struct ClassDef {
    name: String,
    fields: Vec<FieldInfo>,
    methods: Vec<MethodHandle>,
    constructor: Option<AppletConstructor>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructor: None,
        }
    }

    /// Declare a field. Declaration order is preserved.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType, modifiers: Modifiers) -> Self {
        self.fields.push(FieldInfo::new(name, ty, modifiers));
        self
    }

    /// Declare `public static void main(String[])`.
    pub fn main<F>(self, entry: F) -> Self
    where
        F: Fn(&[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.method(
            MAIN_METHOD,
            MethodSignature::main(),
            Modifiers::PUBLIC | Modifiers::STATIC,
            entry,
        )
    }

    /// Declare an arbitrary method.
    pub fn method<F>(
        mut self,
        name: impl Into<String>,
        signature: MethodSignature,
        modifiers: Modifiers,
        entry: F,
    ) -> Self
    where
        F: Fn(&[String]) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let entry: Arc<dyn EntryPoint> = Arc::new(entry);
        self.methods.push(MethodHandle {
            name: name.into(),
            signature,
            modifiers,
            entry,
        });
        self
    }

    /// Declare a public no-argument constructor producing an applet.
    pub fn constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn() -> anyhow::Result<Box<dyn Applet>> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(construct));
        self
    }
}

struct TableClass {
    def: ClassDef,
    statics: Mutex<HashMap<String, PathBuf>>,
}

impl TargetClass for TableClass {
    fn name(&self) -> &str {
        &self.def.name
    }

    fn declared_fields(&self) -> Vec<FieldInfo> {
        self.def.fields.clone()
    }

    fn declared_methods(&self) -> Vec<MethodHandle> {
        self.def.methods.clone()
    }

    fn set_static_field(&self, field: &str, value: &Path) -> anyhow::Result<()> {
        let declared = self
            .def
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| anyhow::anyhow!("no field {} in {}", field, self.def.name))?;
        anyhow::ensure!(
            declared.modifiers.contains(Modifiers::STATIC),
            "field {}.{} is not static",
            self.def.name,
            field
        );

        self.statics
            .lock()
            .map_err(|_| anyhow::anyhow!("static field table poisoned"))?
            .insert(field.to_string(), value.to_path_buf());
        Ok(())
    }

    fn new_instance(&self) -> anyhow::Result<Box<dyn Applet>> {
        let construct = self
            .def
            .constructor
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("{} has no public no-argument constructor", self.def.name))?;
        construct()
    }
}

/// In-memory [`ClassLoader`].
///
/// Cloning shares the classes and their static field values.
#[derive(Clone, Default)]
pub struct ClassTable {
    classes: HashMap<String, Arc<TableClass>>,
}

impl ClassTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, replacing any previous class of the same name.
    pub fn with_class(mut self, def: ClassDef) -> Self {
        let class = TableClass {
            def,
            statics: Mutex::new(HashMap::new()),
        };
        self.classes.insert(class.def.name.clone(), Arc::new(class));
        self
    }

    /// Current value of a static field, if it has been set.
    pub fn static_field(&self, class: &str, field: &str) -> Option<PathBuf> {
        let class = self.classes.get(class)?;
        let statics = class.statics.lock().ok()?;
        statics.get(field).cloned()
    }
}

impl ClassLoader for ClassTable {
    fn load_class(&self, name: &str) -> Result<Arc<dyn TargetClass>, LaunchError> {
        self.classes
            .get(name)
            .map(|class| class.clone() as Arc<dyn TargetClass>)
            .ok_or_else(|| LaunchError::ClassNotFound(name.to_string()))
    }
}

impl ClassLoaderFactory for ClassTable {
    fn create(&self, env: &RuntimeEnvironment) -> Result<Arc<dyn ClassLoader>, LaunchError> {
        tracing::debug!(
            "Using in-memory class table ({} classes, {} class path entries ignored)",
            self.classes.len(),
            env.class_path.len()
        );
        Ok(Arc::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_keep_declaration_order() {
        let table = ClassTable::new().with_class(
            ClassDef::new("game.Main")
                .field("z", FieldType::File, Modifiers::PRIVATE)
                .field("a", FieldType::File, Modifiers::PRIVATE),
        );
        let class = table.load_class("game.Main").unwrap();
        let names: Vec<_> = class.declared_fields().into_iter().map(|f| f.name).collect();
        assert_eq!(names, ["z", "a"]);
    }

    #[test]
    fn test_set_static_field_visible_through_clones() {
        let table = ClassTable::new().with_class(ClassDef::new("game.Main").field(
            "dir",
            FieldType::File,
            Modifiers::PRIVATE | Modifiers::STATIC,
        ));
        let shared = table.clone();

        let class = shared.load_class("game.Main").unwrap();
        class.set_static_field("dir", Path::new("/games/one")).unwrap();

        assert_eq!(
            table.static_field("game.Main", "dir"),
            Some(PathBuf::from("/games/one"))
        );
    }

    #[test]
    fn test_set_static_field_rejects_unknown_and_instance_fields() {
        let table = ClassTable::new().with_class(ClassDef::new("game.Main").field(
            "dir",
            FieldType::File,
            Modifiers::PRIVATE,
        ));
        let class = table.load_class("game.Main").unwrap();
        assert!(class.set_static_field("missing", Path::new("/")).is_err());
        assert!(class.set_static_field("dir", Path::new("/")).is_err());
        assert_eq!(table.static_field("game.Main", "dir"), None);
    }

    #[test]
    fn test_factory_returns_same_classes() {
        let table = ClassTable::new().with_class(ClassDef::new("game.Main"));
        let loader = table.create(&RuntimeEnvironment::new("/tmp")).unwrap();
        assert!(loader.load_class("game.Main").is_ok());
        assert!(loader.load_class("game.Other").is_err());
    }
}
