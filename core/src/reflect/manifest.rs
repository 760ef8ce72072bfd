//! Class path loader backed by TOML class descriptors.
//!
//! A class `net.example.Game` resolves to `net/example/Game.class.toml` in
//! the first class path directory that contains it:
//!
//! ```toml
//! [[fields]]
//! name = "workDir"
//! type = "java.io.File"
//! modifiers = ["private", "static"]
//!
//! [[methods]]
//! name = "main"
//! params = ["java.lang.String[]"]
//! returns = "void"
//! modifiers = ["public", "static"]
//! program = "bin/game"
//! args = ["--classic"]
//!
//! [constructor]
//! program = "bin/game-applet"
//! ```
//!
//! Invoking a method or starting an applet spawns `program` (resolved against
//! the descriptor's directory) and waits for it. The spawned process receives
//! the runtime environment plus any static field overrides as
//! `IGNITE_FIELD_<name>` variables.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use hashbrown::HashMap;
use serde::Deserialize;

use crate::environment::{RuntimeEnvironment, field_env_name};
use crate::error::LaunchError;
use crate::window::{Applet, AppletParameters, FrameGeometry};

use super::{
    ClassLoader, ClassLoaderFactory, EntryPoint, FieldInfo, FieldType, MethodHandle,
    MethodSignature, Modifiers, TargetClass,
};

/// File suffix of class descriptors.
pub const DESCRIPTOR_SUFFIX: &str = ".class.toml";

/// Static field values, keyed by class then field.
type StaticFields = Arc<Mutex<HashMap<String, HashMap<String, PathBuf>>>>;

/// On-disk description of one class.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassDescriptor {
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub constructor: Option<ProgramDescriptor>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "default_returns")]
    pub returns: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProgramDescriptor {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_returns() -> String {
    super::VOID_TYPE.to_string()
}

impl ClassDescriptor {
    /// Read and parse a descriptor file.
    pub fn load(path: &Path) -> Result<Self, LaunchError> {
        let invalid = |reason: String| LaunchError::InvalidClassDescriptor {
            path: path.to_path_buf(),
            reason,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        toml::from_str(&content).map_err(|e| invalid(e.to_string()))
    }
}

/// Relative descriptor path for a dotted class name.
pub fn descriptor_path(class_name: &str) -> PathBuf {
    let mut path: PathBuf = class_name.split('.').collect();
    let simple = class_name.rsplit('.').next().unwrap_or(class_name);
    path.set_file_name(format!("{}{}", simple, DESCRIPTOR_SUFFIX));
    path
}

/// A spawnable program with its leading arguments.
#[derive(Debug, Clone)]
struct Invocation {
    class: String,
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    fn resolve(class: &str, base: &Path, program: &Path, args: &[String]) -> Self {
        // Bare names that do not exist next to the descriptor go through PATH.
        let local = base.join(program);
        let program = if program.is_absolute()
            || local.exists()
            || program.components().count() > 1
        {
            local
        } else {
            program.to_path_buf()
        };
        Self {
            class: class.to_string(),
            program,
            args: args.to_vec(),
        }
    }

    fn command(&self, env: &RuntimeEnvironment, statics: &StaticFields) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.current_dir(&env.working_dir);
        cmd.envs(env.process_env());

        match statics.lock() {
            Ok(statics) => {
                if let Some(fields) = statics.get(&self.class) {
                    for (field, value) in fields {
                        cmd.env(field_env_name(field), value);
                    }
                }
            }
            Err(_) => tracing::warn!("Static field table poisoned; overrides not exported"),
        }

        cmd
    }

    fn run(&self, mut cmd: Command) -> anyhow::Result<()> {
        tracing::info!("Running {}: {:?}", self.class, cmd);

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run '{}'", self.program.display()))?;

        if !status.success() {
            match status.code() {
                Some(code) => anyhow::bail!("{} exited with code {}", self.program.display(), code),
                None => anyhow::bail!("{} was terminated by a signal", self.program.display()),
            }
        }
        Ok(())
    }
}

struct ProcessEntry {
    invocation: Invocation,
    env: Arc<RuntimeEnvironment>,
    statics: StaticFields,
}

impl ProcessEntry {
    fn build_command(&self, args: &[String]) -> Command {
        let mut cmd = self.invocation.command(&self.env, &self.statics);
        cmd.args(args);
        cmd
    }
}

impl EntryPoint for ProcessEntry {
    fn invoke(&self, args: &[String]) -> anyhow::Result<()> {
        self.invocation.run(self.build_command(args))
    }
}

struct ProcessApplet {
    invocation: Invocation,
    env: Arc<RuntimeEnvironment>,
    statics: StaticFields,
}

impl ProcessApplet {
    fn build_command(&self, frame: &FrameGeometry, params: &AppletParameters) -> Command {
        let mut cmd = self.invocation.command(&self.env, &self.statics);
        cmd.arg("--title").arg(&frame.title);
        cmd.arg("--width").arg(frame.width.to_string());
        cmd.arg("--height").arg(frame.height.to_string());
        if frame.maximize {
            cmd.arg("--maximize");
        }
        for (key, value) in params.iter() {
            cmd.arg(format!("{}={}", key, value));
        }
        cmd
    }
}

impl Applet for ProcessApplet {
    fn class_name(&self) -> &str {
        &self.invocation.class
    }

    fn start(&mut self, frame: &FrameGeometry, params: &AppletParameters) -> anyhow::Result<()> {
        self.invocation.run(self.build_command(frame, params))
    }
}

struct ManifestClass {
    name: String,
    dir: PathBuf,
    descriptor: ClassDescriptor,
    fields: Vec<FieldInfo>,
    env: Arc<RuntimeEnvironment>,
    statics: StaticFields,
}

impl ManifestClass {
    fn new(
        name: &str,
        path: &Path,
        descriptor: ClassDescriptor,
        env: Arc<RuntimeEnvironment>,
        statics: StaticFields,
    ) -> Result<Self, LaunchError> {
        let invalid = |reason: String| LaunchError::InvalidClassDescriptor {
            path: path.to_path_buf(),
            reason,
        };

        let fields = descriptor
            .fields
            .iter()
            .map(|field| -> Result<FieldInfo, LaunchError> {
                let modifiers = Modifiers::from_keywords(&field.modifiers)
                    .map_err(|e| invalid(format!("field {}: {}", field.name, e)))?;
                Ok(FieldInfo::new(
                    &field.name,
                    FieldType::parse(&field.type_name),
                    modifiers,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for method in &descriptor.methods {
            Modifiers::from_keywords(&method.modifiers)
                .map_err(|e| invalid(format!("method {}: {}", method.name, e)))?;
        }

        Ok(Self {
            name: name.to_string(),
            dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            descriptor,
            fields,
            env,
            statics,
        })
    }

    fn invocation(&self, program: &Path, args: &[String]) -> Invocation {
        Invocation::resolve(&self.name, &self.dir, program, args)
    }
}

impl TargetClass for ManifestClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_fields(&self) -> Vec<FieldInfo> {
        self.fields.clone()
    }

    fn declared_methods(&self) -> Vec<MethodHandle> {
        self.descriptor
            .methods
            .iter()
            .map(|method| {
                let entry: Arc<dyn EntryPoint> = Arc::new(ProcessEntry {
                    invocation: self.invocation(&method.program, &method.args),
                    env: self.env.clone(),
                    statics: self.statics.clone(),
                });
                MethodHandle {
                    name: method.name.clone(),
                    signature: MethodSignature {
                        params: method.params.clone(),
                        returns: method.returns.clone(),
                    },
                    // Validated when the class was loaded.
                    modifiers: Modifiers::from_keywords(&method.modifiers).unwrap_or_default(),
                    entry,
                }
            })
            .collect()
    }

    fn set_static_field(&self, field: &str, value: &Path) -> anyhow::Result<()> {
        let declared = self
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| anyhow::anyhow!("no field {} in {}", field, self.name))?;
        anyhow::ensure!(
            declared.modifiers.contains(Modifiers::STATIC),
            "field {}.{} is not static",
            self.name,
            field
        );

        self.statics
            .lock()
            .map_err(|_| anyhow::anyhow!("static field table poisoned"))?
            .entry(self.name.clone())
            .or_default()
            .insert(field.to_string(), value.to_path_buf());
        Ok(())
    }

    fn new_instance(&self) -> anyhow::Result<Box<dyn Applet>> {
        let constructor = self
            .descriptor
            .constructor
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("{} has no public no-argument constructor", self.name))?;
        Ok(Box::new(ProcessApplet {
            invocation: self.invocation(&constructor.program, &constructor.args),
            env: self.env.clone(),
            statics: self.statics.clone(),
        }))
    }
}

/// [`ClassLoader`] over the directories of a class path.
///
/// Entries that are not directories (archives, missing paths) are skipped.
/// Relative entries are resolved against the working directory.
#[derive(Clone)]
pub struct ManifestClassLoader {
    env: Arc<RuntimeEnvironment>,
    statics: StaticFields,
}

impl ManifestClassLoader {
    pub fn new(env: RuntimeEnvironment) -> Self {
        Self {
            env: Arc::new(env),
            statics: Arc::default(),
        }
    }

    fn locate(&self, class_name: &str) -> Option<PathBuf> {
        let relative = descriptor_path(class_name);
        self.env
            .class_path
            .iter()
            .map(|entry| self.env.working_dir.join(entry))
            .filter(|entry| entry.is_dir())
            .map(|entry| entry.join(&relative))
            .find(|candidate| candidate.is_file())
    }
}

impl ClassLoader for ManifestClassLoader {
    fn load_class(&self, name: &str) -> Result<Arc<dyn TargetClass>, LaunchError> {
        let path = self
            .locate(name)
            .ok_or_else(|| LaunchError::ClassNotFound(name.to_string()))?;
        tracing::debug!("Loading {} from {}", name, path.display());

        let descriptor = ClassDescriptor::load(&path)?;
        let class = ManifestClass::new(
            name,
            &path,
            descriptor,
            self.env.clone(),
            self.statics.clone(),
        )?;
        Ok(Arc::new(class))
    }
}

/// Creates a [`ManifestClassLoader`] per launch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestClassLoaderFactory;

impl ClassLoaderFactory for ManifestClassLoaderFactory {
    fn create(&self, env: &RuntimeEnvironment) -> Result<Arc<dyn ClassLoader>, LaunchError> {
        if env.class_path.is_empty() {
            tracing::warn!("Class path is empty; no target classes can be loaded");
        }
        Ok(Arc::new(ManifestClassLoader::new(env.clone())))
    }
}
