use serde_json::json;

use crate::collector::api::Collector;
use crate::collector::constants::{FIELD_EVENT, FIELD_KEY, FILTER_ALL, KEY_DOM_PREFIX};
use crate::collector::error::{invalid_argument, CollectorResult};
use crate::collector::observers::guarded;
use crate::collector::record::{event_fields, EventFields};
use crate::collector::LOGGER;
use crate::platform::event::{
    HostEvent, HostWindow, InteractionKind, InteractionTarget, TRACKING_FILTER_ATTRIBUTE,
};

pub(super) fn install(collector: &Collector, host: &dyn HostWindow) -> CollectorResult<()> {
    for kind in InteractionKind::ALL {
        let reporter = collector.clone();
        host.add_event_listener(
            kind.as_str(),
            guarded("dom", move |event, _| {
                if let HostEvent::Interaction { kind, target } = event {
                    if let Some(fields) = interaction_report(*kind, target)? {
                        reporter.report(fields);
                    }
                }
                Ok(())
            }),
        )?;
    }
    Ok(())
}

/// Decides whether an interaction on `target` is reported.
///
/// Elements without a non-blank tracking key are ignored. An absent, empty or `all` filter
/// reports every interaction type; any other filter must list `kind`.
fn interaction_report(
    kind: InteractionKind,
    target: &InteractionTarget,
) -> CollectorResult<Option<EventFields>> {
    let Some(key) = target.tracking_key().filter(|key| !key.trim().is_empty()) else {
        return Ok(None);
    };

    let allowed = match target.tracking_filter() {
        None | Some("") | Some(FILTER_ALL) => true,
        Some(raw) => InteractionFilter::parse(raw)?.allows(kind),
    };
    if !allowed {
        return Ok(None);
    }

    Ok(Some(event_fields([
        (FIELD_EVENT, json!(kind.as_str())),
        (FIELD_KEY, json!(format!("{KEY_DOM_PREFIX}{key}"))),
    ])))
}

/// Parsed `target-event` attribute: a comma-separated list of interaction type names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct InteractionFilter {
    kinds: Vec<InteractionKind>,
}

impl InteractionFilter {
    /// Names are trimmed and matched case-sensitively. Unknown names are skipped with a debug
    /// note; a filter that names no supported type at all is an error.
    pub(crate) fn parse(raw: &str) -> CollectorResult<Self> {
        let mut kinds = Vec::new();
        let mut unknown = Vec::new();
        for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            match name.parse::<InteractionKind>() {
                Ok(kind) => kinds.push(kind),
                Err(_) => unknown.push(name),
            }
        }

        if kinds.is_empty() {
            return Err(invalid_argument(format!(
                "`{TRACKING_FILTER_ATTRIBUTE}` value \"{raw}\" names no supported interaction type"
            )));
        }
        if !unknown.is_empty() {
            LOGGER.debug(format!(
                "`{TRACKING_FILTER_ATTRIBUTE}` value \"{raw}\" has unknown entries: {}",
                unknown.join(", ")
            ));
        }
        Ok(Self { kinds })
    }

    pub(crate) fn allows(&self, kind: InteractionKind) -> bool {
        self.kinds.contains(&kind)
    }
}
