//! Operation dispatcher.
//!
//! The dispatcher owns the image store and the operation registry. For each
//! command it resolves the operation, picks the signature matching the
//! tokens, parses parameters, fetches source images, runs the operation and
//! writes its outputs back to the store. Outputs are stored only after the
//! whole operation succeeded.

use crate::config::EngineConfig;
use crate::core::context::ExecutionContext;
use crate::core::error::{DispatchError, DispatchResult, PrismError};
use crate::core::port::{PortDirection, Signature, Slot};
use crate::core::store::ImageStore;
use crate::dispatch::command::Command;
use crate::filters::registry::OperationRegistry;
use std::fs;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Label used for scripts read from a stream rather than a file.
const STREAM_LABEL: &str = "<stream>";

/// Result of one successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executed {
    /// Registered command word that ran (aliases resolved).
    pub operation: String,
    /// Store names written, in command order.
    pub outputs: Vec<String>,
}

/// A failed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// 1-based line number.
    pub line: usize,
    pub command: String,
    pub message: String,
    /// How to fix the command, when known.
    pub hint: Option<String>,
}

/// Summary of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Commands that ran successfully.
    pub executed: usize,
    pub failures: Vec<ScriptFailure>,
    /// Whether the run ended at a `quit` command.
    pub quit: bool,
    /// Whether the run was cut short by `script.stop_on_error`.
    pub aborted: bool,
}

impl ScriptReport {
    /// Check if every command succeeded.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A per-command event emitted while a script runs.
#[derive(Debug)]
pub enum ScriptEvent<'a> {
    /// A command ran and stored its outputs.
    Succeeded {
        line: usize,
        command: &'a Command,
        executed: &'a Executed,
    },
    /// A command failed; the store is unchanged.
    Failed {
        line: usize,
        command: &'a Command,
        error: &'a DispatchError,
        hint: Option<&'a str>,
    },
}

/// Routes named operations to the engine on named images.
pub struct Dispatcher {
    store: ImageStore,
    registry: OperationRegistry,
    config: Arc<EngineConfig>,
}

impl Dispatcher {
    /// Create a dispatcher with the built-in operations and default config.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create a dispatcher with the built-in operations.
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_registry(OperationRegistry::with_builtins(), config)
    }

    /// Create a dispatcher over a custom registry.
    pub fn with_registry(registry: OperationRegistry, config: EngineConfig) -> Self {
        Self {
            store: ImageStore::new(),
            registry,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ImageStore {
        &mut self.store
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Single commands
    // ========================================================================

    /// Parse and execute one line. Blank and comment lines yield `None`.
    pub fn execute_line(&mut self, line: &str) -> DispatchResult<Option<Executed>> {
        match Command::parse(line) {
            Some(command) => self.execute_command(&command).map(Some),
            None => Ok(None),
        }
    }

    /// Execute a parsed command.
    pub fn execute_command(&mut self, command: &Command) -> DispatchResult<Executed> {
        self.execute(&command.operation, &command.tokens)
    }

    /// Execute operation `name` with argument tokens.
    pub fn execute<S: AsRef<str>>(&mut self, name: &str, tokens: &[S]) -> DispatchResult<Executed> {
        let operation = self
            .registry
            .create(name)
            .ok_or_else(|| DispatchError::UnknownOperation(name.to_string()))?;
        let metadata = operation.metadata();

        let signature = metadata
            .signature_for(tokens)
            .ok_or_else(|| DispatchError::WrongArity {
                operation: metadata.id.clone(),
                usage: metadata.usage(),
            })?;

        let mut ctx = self.bind(&metadata.id, signature, tokens)?;
        operation.validate(&ctx)?;
        operation.execute(&mut ctx)?;

        let mut written = Vec::new();
        for (store_name, image) in ctx.take_outputs()? {
            self.store.put(store_name.clone(), image);
            written.push(store_name);
        }

        log::info!(
            "Executed {} {}",
            metadata.id,
            tokens.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().join(" ")
        );

        Ok(Executed {
            operation: metadata.id,
            outputs: written,
        })
    }

    /// Fill a context from the tokens matched against `signature`.
    fn bind<S: AsRef<str>>(
        &self,
        operation: &str,
        signature: &Signature,
        tokens: &[S],
    ) -> DispatchResult<ExecutionContext> {
        let mut ctx = ExecutionContext::with_config(operation, Arc::clone(&self.config));

        for (slot, token) in signature.slots.iter().zip(tokens) {
            let token = token.as_ref();
            match slot {
                Slot::Keyword { .. } => {}
                Slot::Parameter(parameter) => {
                    let value = parameter
                        .parse(token)
                        .and_then(|value| parameter.validate(&value).map(|_| value))
                        .map_err(|reason| DispatchError::InvalidArgument {
                            operation: operation.to_string(),
                            parameter: parameter.name.clone(),
                            value: token.to_string(),
                            reason,
                        })?;
                    ctx.add_parameter(parameter.name.clone(), value);
                }
                Slot::Image(port) => match port.direction {
                    PortDirection::Input => {
                        let image = self.store.require(token)?.clone();
                        ctx.add_input(port.name.clone(), token, image);
                    }
                    PortDirection::Output => ctx.add_destination(port.name.clone(), token),
                },
            }
        }

        Ok(ctx)
    }

    /// A fix for `error`: close command words for an unknown operation,
    /// otherwise the error's own suggestion.
    pub fn hint(&self, error: &DispatchError) -> Option<String> {
        match error {
            DispatchError::UnknownOperation(name) => {
                let close = self.registry.suggestions(name);
                if close.is_empty() {
                    None
                } else {
                    Some(format!("Did you mean: {}?", close.join(", ")))
                }
            }
            other => other.suggested_fix(),
        }
    }

    // ========================================================================
    // Scripts
    // ========================================================================

    /// Run every command from `reader`.
    pub fn run_script<R: BufRead>(&mut self, reader: R) -> DispatchResult<ScriptReport> {
        self.run_script_with(reader, |_| {})
    }

    /// Run every command from `reader`, reporting each one to `observer`.
    ///
    /// Failing commands are recorded and skipped. The run ends at end of
    /// input, at `quit`, or at the first failure when
    /// `script.stop_on_error` is set.
    pub fn run_script_with<R, F>(&mut self, reader: R, mut observer: F) -> DispatchResult<ScriptReport>
    where
        R: BufRead,
        F: FnMut(ScriptEvent<'_>),
    {
        let mut report = ScriptReport::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| DispatchError::Script {
                path: PathBuf::from(STREAM_LABEL),
                source,
            })?;
            let number = index + 1;

            let Some(command) = Command::parse(&line) else {
                continue;
            };
            if command.is_quit() {
                report.quit = true;
                break;
            }

            match self.execute_command(&command) {
                Ok(executed) => {
                    report.executed += 1;
                    observer(ScriptEvent::Succeeded {
                        line: number,
                        command: &command,
                        executed: &executed,
                    });
                }
                Err(error) => {
                    log::warn!("Line {}: {}: {}", number, command, error);
                    let hint = self.hint(&error);
                    observer(ScriptEvent::Failed {
                        line: number,
                        command: &command,
                        error: &error,
                        hint: hint.as_deref(),
                    });
                    report.failures.push(ScriptFailure {
                        line: number,
                        command: command.to_string(),
                        message: error.to_string(),
                        hint,
                    });
                    if self.config.script.stop_on_error || !error.is_recoverable() {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        Ok(report)
    }

    /// Run a script file.
    pub fn run_script_file(&mut self, path: &Path) -> DispatchResult<ScriptReport> {
        self.run_script_file_with(path, |_| {})
    }

    /// Run a script file, reporting each command to `observer`.
    pub fn run_script_file_with<F>(&mut self, path: &Path, observer: F) -> DispatchResult<ScriptReport>
    where
        F: FnMut(ScriptEvent<'_>),
    {
        let contents = fs::read_to_string(path).map_err(|source| DispatchError::Script {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Running script {}", path.display());
        self.run_script_with(contents.as_bytes(), observer)
    }

    /// Load the configuration (explicit path, then `PRISM_CONFIG`, then
    /// defaults) and run the script at `path` on a fresh dispatcher.
    pub fn run_configured<F>(
        path: &Path,
        config: Option<&Path>,
        observer: F,
    ) -> Result<(Self, ScriptReport), PrismError>
    where
        F: FnMut(ScriptEvent<'_>),
    {
        let mut dispatcher = Self::with_config(EngineConfig::discover(config)?);
        let report = dispatcher.run_script_file_with(path, observer)?;
        Ok((dispatcher, report))
    }
}


impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ImagingError;
    use crate::core::types::Image;

    fn dispatcher_with_koala() -> Dispatcher {
        let mut dispatcher = Dispatcher::new();
        dispatcher.store_mut().put(
            "koala",
            Image::from_rows(&[
                vec![[255, 0, 0], [0, 255, 0]],
                vec![[0, 0, 255], [255, 255, 0]],
            ])
            .unwrap(),
        );
        dispatcher
    }

    #[test]
    fn test_execute_stores_output() {
        let mut dispatcher = dispatcher_with_koala();
        let executed = dispatcher.execute("brighten", &["50", "koala", "bright"]).unwrap();

        assert_eq!(executed.operation, "brighten");
        assert_eq!(executed.outputs, ["bright"]);
        assert_eq!(dispatcher.store().require("bright").unwrap().pixel(1, 1), [255, 255, 50]);
    }

    #[test]
    fn test_alias_and_case() {
        let mut dispatcher = dispatcher_with_koala();
        let executed = dispatcher.execute("COPY", &["twin", "koala"]).unwrap();
        assert_eq!(executed.operation, "reset");
        assert!(dispatcher.store().contains("twin"));
    }

    #[test]
    fn test_unknown_operation() {
        let mut dispatcher = dispatcher_with_koala();
        assert!(matches!(
            dispatcher.execute("emboss", &["koala", "k"]),
            Err(DispatchError::UnknownOperation(name)) if name == "emboss"
        ));
    }

    #[test]
    fn test_wrong_arity_reports_usage() {
        let mut dispatcher = dispatcher_with_koala();
        match dispatcher.execute("blur", &["koala"]) {
            Err(DispatchError::WrongArity { usage, .. }) => {
                assert!(usage.contains("blur src dst split p"));
            }
            other => panic!("expected WrongArity, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_must_match() {
        let mut dispatcher = dispatcher_with_koala();
        assert!(matches!(
            dispatcher.execute("blur", &["koala", "k", "spilt", "50"]),
            Err(DispatchError::WrongArity { .. })
        ));
    }

    #[test]
    fn test_parameter_validation() {
        let mut dispatcher = dispatcher_with_koala();
        for tokens in [["koala", "k", "split", "101"], ["koala", "k", "split", "half"]] {
            assert!(matches!(
                dispatcher.execute("sepia", &tokens),
                Err(DispatchError::InvalidArgument { .. })
            ));
        }
        assert!(!dispatcher.store().contains("k"));
    }

    #[test]
    fn test_levels_order_rejected_before_store_changes() {
        let mut dispatcher = dispatcher_with_koala();
        let result = dispatcher.execute("levels-adjust", &["100", "50", "200", "koala", "koala"]);
        assert!(matches!(
            result,
            Err(DispatchError::Imaging(ImagingError::InvalidLevels { .. }))
        ));
        assert_eq!(dispatcher.store().require("koala").unwrap().pixel(0, 0), [255, 0, 0]);
    }

    #[test]
    fn test_hints() {
        let dispatcher = Dispatcher::new();
        let hint = dispatcher
            .hint(&DispatchError::UnknownOperation("blurr".to_string()))
            .unwrap();
        assert!(hint.contains("blur"));
        assert_eq!(dispatcher.hint(&DispatchError::UnknownOperation("zz".to_string())), None);
        assert!(dispatcher
            .hint(&DispatchError::ImageNotFound { name: "koala".to_string() })
            .unwrap()
            .contains("koala"));
    }

    #[test]
    fn test_missing_source() {
        let mut dispatcher = dispatcher_with_koala();
        assert!(matches!(
            dispatcher.execute("flip", &["wombat", "w"]),
            Err(DispatchError::ImageNotFound { name }) if name == "wombat"
        ));
    }

    #[test]
    fn test_execute_line_skips_comments() {
        let mut dispatcher = dispatcher_with_koala();
        assert_eq!(dispatcher.execute_line("# nothing").unwrap(), None);
        assert!(dispatcher.execute_line("Flip koala upside").unwrap().is_some());
    }

    #[test]
    fn test_script_continues_after_failure() {
        let mut dispatcher = dispatcher_with_koala();
        let script = "\
# demo
blur koala k-blur

sharpen wombat w
rgb-split koala r g b
quit
sepia koala never
";
        let mut events = Vec::new();
        let report = dispatcher
            .run_script_with(script.as_bytes(), |event| {
                events.push(match event {
                    ScriptEvent::Succeeded { line, .. } => (line, true),
                    ScriptEvent::Failed { line, .. } => (line, false),
                })
            })
            .unwrap();

        assert_eq!(report.executed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].line, 4);
        assert!(report.quit);
        assert!(!report.aborted);
        assert_eq!(events, [(2, true), (4, false), (5, true)]);
        assert!(dispatcher.store().contains("b"));
        assert!(!dispatcher.store().contains("never"));
    }

    #[test]
    fn test_stop_on_error() {
        let mut config = EngineConfig::default();
        config.script.stop_on_error = true;
        let mut dispatcher = Dispatcher::with_config(config);

        let report = dispatcher
            .run_script("sharpen wombat w\nload missing.ppm m\n".as_bytes())
            .unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(report.aborted);
    }

    #[test]
    fn test_run_configured_reports_each_layer() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("run.txt");
        fs::write(&script, "blur ghost out\n").unwrap();

        let config = dir.path().join("prism.toml");
        fs::write(&config, "[script]\nstop_on_error = true\n").unwrap();
        let (dispatcher, report) = Dispatcher::run_configured(&script, Some(&config), |_| {}).unwrap();
        assert!(dispatcher.config().script.stop_on_error);
        assert!(report.aborted);

        let missing_config = dir.path().join("absent.toml");
        assert!(matches!(
            Dispatcher::run_configured(&script, Some(&missing_config), |_| {}),
            Err(PrismError::Config(_))
        ));
        assert!(matches!(
            Dispatcher::run_configured(&dir.path().join("absent.txt"), Some(&config), |_| {}),
            Err(PrismError::Dispatch(DispatchError::Script { .. }))
        ));
    }

    #[test]
    fn test_missing_script_file() {
        let mut dispatcher = Dispatcher::new();
        assert!(matches!(
            dispatcher.run_script_file(Path::new("/definitely/not/here.txt")),
            Err(DispatchError::Script { .. })
        ));
    }
}
