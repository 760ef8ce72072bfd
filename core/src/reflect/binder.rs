//! Entry-point and applet resolution.

use std::sync::Arc;

use crate::error::LaunchError;
use crate::window::Applet;

use super::{ClassLoader, EntryPoint, MethodSignature, Modifiers, TargetClass};

/// Name of the entry point procedure.
pub const MAIN_METHOD: &str = "main";

/// Resolve the main entry point of a class.
///
/// Matches a method with the following shape:
///
/// ```text
/// public static void main(String[] args)
/// ```
pub fn find_main_entrypoint(class: &dyn TargetClass) -> Result<Arc<dyn EntryPoint>, LaunchError> {
    let signature = MethodSignature::main();

    class
        .declared_methods()
        .into_iter()
        .find(|method| {
            method.name == MAIN_METHOD
                && method.signature == signature
                && method.modifiers.contains(Modifiers::STATIC)
        })
        .map(|method| method.entry)
        .ok_or_else(|| LaunchError::EntryPointNotFound(class.name().to_string()))
}

/// Resolve the main entry point of a class by name.
pub fn find_main_method(
    loader: &dyn ClassLoader,
    class_name: &str,
) -> Result<Arc<dyn EntryPoint>, LaunchError> {
    let class = loader.load_class(class_name)?;
    find_main_entrypoint(class.as_ref())
}

/// Instantiate an applet class by name through its no-argument constructor.
pub fn create_applet(
    loader: &dyn ClassLoader,
    applet_class_name: &str,
) -> Result<Box<dyn Applet>, LaunchError> {
    let class = loader.load_class(applet_class_name)?;
    class.new_instance().map_err(|e| {
        LaunchError::WrapperConstructionFailed(format!(
            "cannot instantiate {}: {:#}",
            applet_class_name, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::reflect::{ClassDef, ClassTable};
    use crate::window::test_support::RecordingApplet;

    fn table() -> ClassTable {
        ClassTable::new()
            .with_class(ClassDef::new("game.Main").main(|_: &[String]| Ok(())))
            .with_class(ClassDef::new("game.NoMain"))
            .with_class(
                ClassDef::new("game.InstanceMain").method(
                    MAIN_METHOD,
                    MethodSignature::main(),
                    Modifiers::PUBLIC,
                    |_: &[String]| Ok(()),
                ),
            )
            .with_class(
                ClassDef::new("game.WrongSignature").method(
                    MAIN_METHOD,
                    MethodSignature {
                        params: vec!["int".to_string()],
                        returns: "void".to_string(),
                    },
                    Modifiers::PUBLIC | Modifiers::STATIC,
                    |_: &[String]| Ok(()),
                ),
            )
    }

    #[test]
    fn test_find_main_method() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let table = ClassTable::new().with_class(ClassDef::new("game.Main").main(
            move |args: &[String]| {
                record.lock().unwrap().extend_from_slice(args);
                Ok(())
            },
        ));

        let entry = find_main_method(&table, "game.Main").unwrap();
        entry.invoke(&["--demo".to_string()]).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["--demo"]);
    }

    #[test]
    fn test_find_main_method_class_not_found() {
        let err = find_main_method(&table(), "game.Missing").err().unwrap();
        assert!(matches!(err, LaunchError::ClassNotFound(name) if name == "game.Missing"));
    }

    #[test]
    fn test_find_main_method_no_main() {
        let err = find_main_method(&table(), "game.NoMain").err().unwrap();
        assert!(matches!(err, LaunchError::EntryPointNotFound(name) if name == "game.NoMain"));
    }

    #[test]
    fn test_find_main_method_requires_static() {
        let err = find_main_method(&table(), "game.InstanceMain").err().unwrap();
        assert!(matches!(err, LaunchError::EntryPointNotFound(_)));
    }

    #[test]
    fn test_find_main_method_requires_signature() {
        let err = find_main_method(&table(), "game.WrongSignature").err().unwrap();
        assert!(matches!(err, LaunchError::EntryPointNotFound(_)));
    }

    #[test]
    fn test_invocation_errors_propagate() {
        let table = ClassTable::new().with_class(
            ClassDef::new("game.Crash").main(|_: &[String]| anyhow::bail!("crashed on boot")),
        );
        let entry = find_main_method(&table, "game.Crash").unwrap();
        let err = entry.invoke(&[]).unwrap_err();
        assert_eq!(err.to_string(), "crashed on boot");
    }

    #[test]
    fn test_create_applet() {
        let table = ClassTable::new().with_class(
            ClassDef::new("game.Applet")
                .constructor(|| Ok(Box::new(RecordingApplet::new("game.Applet")) as Box<dyn Applet>)),
        );
        let applet = create_applet(&table, "game.Applet").unwrap();
        assert_eq!(applet.class_name(), "game.Applet");
    }

    #[test]
    fn test_create_applet_without_constructor() {
        let err = create_applet(&table(), "game.NoMain").err().unwrap();
        assert!(matches!(err, LaunchError::WrapperConstructionFailed(_)));
    }

    #[test]
    fn test_create_applet_missing_class() {
        let err = create_applet(&table(), "game.Missing").err().unwrap();
        assert!(matches!(err, LaunchError::ClassNotFound(_)));
    }
}
