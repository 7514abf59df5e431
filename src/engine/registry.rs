use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// How a compiler invocation is assembled for a compiled language.
#[derive(Debug, Clone)]
pub enum CompileTemplate {
    /// `program <source>`; the artifact takes the name of the declared
    /// entry class (javac shape)
    SourceOnly { program: String },
    /// `program <flag> <artifact> <source>` with a fixed artifact name
    /// (g++ -o shape)
    OutputFlag {
        program: String,
        flag: String,
        artifact: String,
    },
}

impl CompileTemplate {
    /// Resolves the concrete compiler command for a staged source file.
    /// Paths are workspace-relative; stages run with the workspace as cwd.
    pub fn command(&self, source_file: &str) -> (String, Vec<String>) {
        match self {
            Self::SourceOnly { program } => (program.clone(), vec![source_file.to_string()]),
            Self::OutputFlag {
                program,
                flag,
                artifact,
            } => (
                program.clone(),
                vec![flag.clone(), artifact.clone(), source_file.to_string()],
            ),
        }
    }
}

/// How the run command is resolved once staging (and compilation) are done.
#[derive(Debug, Clone)]
pub enum RunTemplate {
    /// `program <staged source>`
    Interpreter { program: String },
    /// `program <entry class>`; the artifact is located by name because
    /// the compiler ran in the same directory the program runs in
    ClassName { program: String },
    /// direct invocation of the compiled artifact
    Artifact { name: String },
}

impl RunTemplate {
    pub fn command(&self, source_file: &str, work_dir: &Path) -> (String, Vec<String>) {
        match self {
            Self::Interpreter { program } => (program.clone(), vec![source_file.to_string()]),
            Self::ClassName { program } => {
                let class = Path::new(source_file)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source_file.to_string());
                (program.clone(), vec![class])
            }
            // Absolute program path: relative-program-plus-current_dir
            // resolution is platform-specific for std Command.
            Self::Artifact { name } => (
                work_dir.join(name).to_string_lossy().into_owned(),
                Vec::new(),
            ),
        }
    }
}

/// Fixed configuration describing how one supported language is staged,
/// optionally compiled, and run. Built once at startup, immutable and
/// shared read-only across concurrent executions.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub extension: String,
    pub compile: Option<CompileTemplate>,
    pub run: RunTemplate,
    pub timeout: Duration,
}

impl LanguageProfile {
    /// Whether the staged filename must follow the source's declared
    /// entry-class name instead of the fixed `main` stem
    pub fn stages_by_class_name(&self) -> bool {
        matches!(self.run, RunTemplate::ClassName { .. })
    }
}

/// Flat mapping from language identifier to its execution profile.
/// Adding a language means adding one entry.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageProfile>,
}

impl LanguageRegistry {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, LanguageProfile)>,
        S: Into<String>,
    {
        Self {
            languages: entries
                .into_iter()
                .map(|(name, profile)| (name.into(), profile))
                .collect(),
        }
    }

    /// The five builtin languages and their time budgets
    pub fn builtin() -> Self {
        Self::new([
            (
                "python",
                LanguageProfile {
                    extension: ".py".to_string(),
                    compile: None,
                    run: RunTemplate::Interpreter {
                        program: "python3".to_string(),
                    },
                    timeout: Duration::from_secs(10),
                },
            ),
            (
                "javascript",
                LanguageProfile {
                    extension: ".js".to_string(),
                    compile: None,
                    run: RunTemplate::Interpreter {
                        program: "node".to_string(),
                    },
                    timeout: Duration::from_secs(10),
                },
            ),
            (
                "java",
                LanguageProfile {
                    extension: ".java".to_string(),
                    compile: Some(CompileTemplate::SourceOnly {
                        program: "javac".to_string(),
                    }),
                    run: RunTemplate::ClassName {
                        program: "java".to_string(),
                    },
                    timeout: Duration::from_secs(15),
                },
            ),
            (
                "cpp",
                LanguageProfile {
                    extension: ".cpp".to_string(),
                    compile: Some(CompileTemplate::OutputFlag {
                        program: "g++".to_string(),
                        flag: "-o".to_string(),
                        artifact: "main".to_string(),
                    }),
                    run: RunTemplate::Artifact {
                        name: "main".to_string(),
                    },
                    timeout: Duration::from_secs(15),
                },
            ),
            (
                "ruby",
                LanguageProfile {
                    extension: ".rb".to_string(),
                    compile: None,
                    run: RunTemplate::Interpreter {
                        program: "ruby".to_string(),
                    },
                    timeout: Duration::from_secs(10),
                },
            ),
        ])
    }

    pub fn get(&self, language: &str) -> Option<&LanguageProfile> {
        self.languages.get(language)
    }

    /// Supported identifiers, sorted for a stable health-probe shape
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_registry_contents() {
        let registry = LanguageRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["cpp", "java", "javascript", "python", "ruby"]
        );

        let python = registry.get("python").unwrap();
        assert!(python.compile.is_none());
        assert_eq!(python.extension, ".py");
        assert_eq!(python.timeout, Duration::from_secs(10));

        let java = registry.get("java").unwrap();
        assert!(java.compile.is_some());
        assert!(java.stages_by_class_name());
        assert_eq!(java.timeout, Duration::from_secs(15));

        let cpp = registry.get("cpp").unwrap();
        assert!(!cpp.stages_by_class_name());
        assert_eq!(cpp.timeout, Duration::from_secs(15));
    }

    #[test]
    fn unknown_language_is_absent() {
        assert!(LanguageRegistry::builtin().get("fortran").is_none());
    }

    #[test]
    fn interpreter_command_applies_program_to_source() {
        let run = RunTemplate::Interpreter {
            program: "python3".to_string(),
        };
        let (program, args) = run.command("main.py", Path::new("/tmp/ws"));
        assert_eq!(program, "python3");
        assert_eq!(args, vec!["main.py"]);
    }

    #[test]
    fn class_name_command_uses_file_stem() {
        let run = RunTemplate::ClassName {
            program: "java".to_string(),
        };
        let (program, args) = run.command("Solution.java", Path::new("/tmp/ws"));
        assert_eq!(program, "java");
        assert_eq!(args, vec!["Solution"]);
    }

    #[test]
    fn artifact_command_resolves_against_the_workspace() {
        let run = RunTemplate::Artifact {
            name: "main".to_string(),
        };
        let (program, args) = run.command("main.cpp", Path::new("/tmp/ws"));
        assert_eq!(program, "/tmp/ws/main");
        assert!(args.is_empty());
    }

    #[test]
    fn compile_commands_match_their_shapes() {
        let javac = CompileTemplate::SourceOnly {
            program: "javac".to_string(),
        };
        assert_eq!(
            javac.command("Solution.java"),
            ("javac".to_string(), vec!["Solution.java".to_string()])
        );

        let gcc = CompileTemplate::OutputFlag {
            program: "g++".to_string(),
            flag: "-o".to_string(),
            artifact: "main".to_string(),
        };
        assert_eq!(
            gcc.command("main.cpp"),
            (
                "g++".to_string(),
                vec!["-o".to_string(), "main".to_string(), "main.cpp".to_string()]
            )
        );
    }
}
