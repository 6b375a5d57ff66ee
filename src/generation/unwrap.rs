//! Statements that rebuild typed objects inside a parsed generic response.
//!
//! `Result«Page«List«User»»»` parsed as `models.Result[...]` still leaves the
//! payload slots as raw dicts. The generator walks the chain and emits, for
//! each level with a known slot, the statement that re-instantiates the next
//! level:
//!
//! ```python
//! resp.data = models.Page(**resp.data)
//! resp.data.records = [models.User(**v) for v in resp.data.records]
//! ```

use crate::generation::grammar::{self, parse_chain};
use crate::generation::ir::{UnwrapStatement, UnwrapStep};
use crate::generation::registry::GenericRegistry;
use crate::generation::type_mapper::{TypeMapper, map_primitive};

/// Variable holding the parsed response in the emitted function
pub const RESPONSE_VAR: &str = "resp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The class has no registered payload property
    NoGenericSlot,
    /// The payload is a list of lists; elements stay raw
    NestedSequence,
}

/// A chain level that produced no statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLevel {
    pub class: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnwrapOutcome {
    pub statements: Vec<UnwrapStatement>,
    pub skipped: Vec<SkippedLevel>,
}

pub struct UnwrapGenerator<'a> {
    mapper: &'a TypeMapper,
    registry: &'a GenericRegistry,
}

impl<'a> UnwrapGenerator<'a> {
    pub fn new(mapper: &'a TypeMapper, registry: &'a GenericRegistry) -> Self {
        Self { mapper, registry }
    }

    /// Walk the levels of `type_ref` outermost first.
    ///
    /// The walk ends at the last level or when the next level is a primitive.
    /// After a per-element rebuild, deeper statements run inside a
    /// `for item{n} in <list>:` loop over the rebuilt elements.
    pub fn generate(&self, type_ref: &str) -> UnwrapOutcome {
        let chain = parse_chain(type_ref);
        let levels = grammar::levels(&chain);

        let mut outcome = UnwrapOutcome::default();
        let mut path = RESPONSE_VAR.to_string();
        let mut depth = 0;
        let mut loops = 0;
        let mut iterate_path = false;

        for (index, level) in levels.iter().enumerate() {
            let Some(next) = levels.get(index + 1) else {
                break;
            };
            if map_primitive(next.class).is_some() {
                break;
            }

            let Some(slot) = self.registry.slot(level.class) else {
                outcome.skipped.push(SkippedLevel {
                    class: level.class.to_string(),
                    reason: SkipReason::NoGenericSlot,
                });
                continue;
            };

            let list_depth = if slot.sequence {
                next.list_depth.max(1)
            } else {
                next.list_depth
            };
            if list_depth > 1 {
                outcome.skipped.push(SkippedLevel {
                    class: level.class.to_string(),
                    reason: SkipReason::NestedSequence,
                });
                break;
            }

            if iterate_path {
                loops += 1;
                let var = format!("item{loops}");
                outcome.statements.push(UnwrapStatement {
                    depth,
                    step: UnwrapStep::Loop {
                        var: var.clone(),
                        iterable: path,
                    },
                });
                depth += 1;
                path = var;
                iterate_path = false;
            }

            path = format!("{path}.{}", slot.property);
            let constructor = self.mapper.qualify(next.class);
            let step = if list_depth == 1 {
                iterate_path = true;
                UnwrapStep::Each {
                    target: path.clone(),
                    constructor,
                }
            } else {
                UnwrapStep::Single {
                    target: path.clone(),
                    constructor,
                }
            };
            outcome.statements.push(UnwrapStatement { depth, step });
        }

        outcome
    }
}
