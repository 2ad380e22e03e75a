//! Deciding whether a module may be applied to an environment
//!
//! The [`Verifier`] is built once, from [`Settings`] and the fixed set of modules, and then
//! queried from any thread whenever a module is about to be applied somewhere:
//!
//!   1. [`Verifier::classify`] says whether the class being instrumented is off-limits
//!   2. [`Verifier::verify`] says whether the module links against the environment
//!
//! Module references are extracted once and kept for the life of the verifier. Everything tied
//! to an environment (its symbol table and verdicts) is only weakly tied to it, so the verifier
//! never keeps an environment alive.

mod cache;
mod ignored_types;

pub use cache::*;
pub use ignored_types::*;

use ignored_types::internal_form;

use crate::environment::{Environment, EnvironmentSymbolTable};
use crate::matcher::{self, MismatchReason, Verdict};
use crate::reference::{ExtractionError, ModuleDefinition, ReferenceCollector, ReferenceModel};
use crate::settings::Settings;
use crate::util::{arc_address, BoundedFifo, Trie, WeakKeyMap};
use elsa::sync::FrozenMap;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub struct Verifier {
    settings: Settings,

    /// Classes modules may reference without them being checked
    excluded: Trie<()>,
    ignored: IgnoredTypes,
    modules: BTreeMap<String, ModuleDefinition>,

    /// Extracted on first use
    models: FrozenMap<String, Box<Result<ReferenceModel, ExtractionError>>>,
    tables: WeakKeyMap<Environment, Arc<EnvironmentSymbolTable>>,
    verdicts: VerdictCache,

    /// Recent rejections, which are only logged the first time around
    rejected: Mutex<BoundedFifo<(String, usize)>>,
}

impl Verifier {
    pub fn new(settings: Settings, modules: impl IntoIterator<Item = ModuleDefinition>) -> Verifier {
        let excluded = settings
            .excluded_prefixes
            .iter()
            .map(|prefix| (internal_form(prefix), ()))
            .collect();
        let mut ignored = IgnoredTypes::new();
        for prefix in &settings.ignored_prefixes {
            ignored.ignore(prefix);
        }
        for prefix in &settings.allowed_prefixes {
            ignored.allow(prefix);
        }
        let modules = modules
            .into_iter()
            .map(|module| (module.name().to_owned(), module))
            .collect();

        Verifier {
            excluded,
            ignored,
            modules,
            models: FrozenMap::new(),
            tables: WeakKeyMap::new(),
            verdicts: VerdictCache::new(settings.verdict_cache_capacity),
            rejected: Mutex::new(BoundedFifo::new(settings.rejection_log_capacity)),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.keys().map(String::as_str)
    }

    /// Should a class be instrumented at all?
    pub fn classify(&self, name: &str) -> Policy {
        self.ignored.classify(name)
    }

    /// References of a module, extracted the first time they are asked for
    ///
    /// Returns `None` for unknown modules.
    pub fn reference_model(
        &self,
        module: &str,
    ) -> Option<Result<&ReferenceModel, &ExtractionError>> {
        if let Some(model) = self.models.get(module) {
            return Some(model.as_ref());
        }

        let definition = self.modules.get(module)?;
        let model = ReferenceCollector::new(definition, &self.excluded).collect();
        match &model {
            Ok(model) => log::debug!(
                "Module {} references {} symbols and has {} helpers",
                module,
                model.len(),
                model.helpers.len()
            ),
            Err(err) => log::warn!("Module {} cannot be verified: {}", module, err),
        }
        Some(self.models.insert(module.to_owned(), Box::new(model)).as_ref())
    }

    /// Can a module safely be applied to an environment?
    ///
    /// Anything going wrong along the way makes the verdict `Incompatible`. Verdicts are cached
    /// per module and environment, except for those coming from unexpected failures.
    pub fn verify(&self, module: &str, environment: &Arc<Environment>) -> Verdict {
        if let Some(verdict) = self.verdicts.get(module, environment) {
            return verdict;
        }

        let verdict =
            match panic::catch_unwind(AssertUnwindSafe(|| self.check(module, environment))) {
                Ok(verdict) => {
                    self.verdicts.put(module, environment, verdict.clone());
                    verdict
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    log::warn!(
                        "Verifying module {} against {} failed: {}",
                        module,
                        environment.name(),
                        message
                    );
                    Verdict::failed(MismatchReason::CheckFailed(message))
                }
            };

        if !verdict.is_compatible() {
            self.log_rejection(module, environment, &verdict);
        }
        verdict
    }

    /// Forget everything about environments which are gone, returning how many entries went
    pub fn sweep(&self) -> usize {
        let tables = self.tables.sweep();
        let verdicts = self.verdicts.sweep();
        // Addresses of dropped environments may now be reused
        let rejected = {
            let mut rejected = self.rejected.lock();
            let count = rejected.len();
            rejected.clear();
            count
        };
        log::debug!(
            "Swept {} symbol tables and {} verdicts, forgot {} rejections",
            tables,
            verdicts,
            rejected
        );
        tables + verdicts
    }

    /// Number of environments with a live symbol table
    pub fn environment_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of cached verdicts
    pub fn cached_verdicts(&self) -> usize {
        self.verdicts.len()
    }

    fn check(&self, module: &str, environment: &Arc<Environment>) -> Verdict {
        let model = match self.reference_model(module) {
            Some(Ok(model)) => model,
            Some(Err(err)) => {
                return Verdict::failed(MismatchReason::ExtractionFailed(err.to_string()))
            }
            None => {
                return Verdict::failed(MismatchReason::ExtractionFailed(format!(
                    "no module named {}",
                    module
                )))
            }
        };
        let table = self.tables.get_or_insert_with(environment, || {
            log::debug!("New symbol table for {}", environment.name());
            Arc::new(EnvironmentSymbolTable::with_platform(
                environment,
                self.excluded.clone(),
            ))
        });
        matcher::check(model, &table)
    }

    fn log_rejection(&self, module: &str, environment: &Arc<Environment>, verdict: &Verdict) {
        let key = (module.to_owned(), arc_address(environment));
        {
            let mut rejected = self.rejected.lock();
            if rejected.contains(&key) {
                return;
            }
            rejected.push(key);
        }
        log::warn!(
            "Module {} is not applied to {}: {}",
            module,
            environment.name(),
            verdict
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("panicked")
    }
}
