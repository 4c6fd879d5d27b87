//! Helpers shared by the kindred test suites.

/// Tracing capture for asserting on spans and events in tests.
pub mod tracing {
    use std::{
        collections::BTreeMap,
        fmt,
        sync::{Arc, Mutex, MutexGuard, PoisonError},
    };

    use tracing::{
        Event, Level, Subscriber,
        field::{Field, Visit},
        span::{Attributes, Id, Record},
    };
    use tracing_subscriber::{
        layer::{Context, Layer},
        registry::LookupSpan,
    };

    /// Field values rendered to strings, keyed by field name.
    pub type Fields = BTreeMap<String, String>;

    /// A span observed by [`RecordingLayer`], captured when it closes.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct SpanRecord {
        pub name: &'static str,
        pub fields: Fields,
    }

    impl SpanRecord {
        /// Rendered value of `name`, if the span recorded it.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }
    }

    /// An event observed by [`RecordingLayer`].
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct EventRecord {
        pub level: Level,
        pub target: String,
        pub fields: Fields,
    }

    impl EventRecord {
        /// Rendered value of `name`, if the event carried it.
        #[must_use]
        pub fn field(&self, name: &str) -> Option<&str> {
            self.fields.get(name).map(String::as_str)
        }

        /// The event's message, if it had one.
        #[must_use]
        pub fn message(&self) -> Option<&str> {
            self.field("message")
        }
    }

    #[derive(Debug, Default)]
    struct Journal {
        open: BTreeMap<u64, SpanRecord>,
        closed: Vec<SpanRecord>,
        events: Vec<EventRecord>,
    }

    /// `tracing` layer that keeps every closed span and every event.
    ///
    /// Clones share one journal, so a test keeps a clone for inspection and
    /// hands the other to the subscriber.
    #[derive(Clone, Debug, Default)]
    pub struct RecordingLayer {
        journal: Arc<Mutex<Journal>>,
    }

    impl RecordingLayer {
        /// Spans that have closed, in closing order.
        #[must_use]
        pub fn spans(&self) -> Vec<SpanRecord> {
            self.journal().closed.clone()
        }

        /// Events, in emission order.
        #[must_use]
        pub fn events(&self) -> Vec<EventRecord> {
            self.journal().events.clone()
        }

        /// Closed spans called `name`.
        #[must_use]
        pub fn spans_named(&self, name: &str) -> Vec<SpanRecord> {
            self.journal()
                .closed
                .iter()
                .filter(|span| span.name == name)
                .cloned()
                .collect()
        }

        /// Events emitted at exactly `level`.
        #[must_use]
        pub fn events_at(&self, level: Level) -> Vec<EventRecord> {
            self.journal()
                .events
                .iter()
                .filter(|event| event.level == level)
                .cloned()
                .collect()
        }

        /// Events whose message equals `message`.
        #[must_use]
        pub fn events_with_message(&self, message: &str) -> Vec<EventRecord> {
            self.journal()
                .events
                .iter()
                .filter(|event| event.message() == Some(message))
                .cloned()
                .collect()
        }

        fn journal(&self) -> MutexGuard<'_, Journal> {
            self.journal.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl<S> Layer<S> for RecordingLayer
    where
        S: Subscriber + for<'lookup> LookupSpan<'lookup>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            attrs.record(&mut FieldWriter(&mut fields));
            self.journal().open.insert(
                id.into_u64(),
                SpanRecord {
                    name: attrs.metadata().name(),
                    fields,
                },
            );
        }

        fn on_record(&self, id: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
            if let Some(span) = self.journal().open.get_mut(&id.into_u64()) {
                values.record(&mut FieldWriter(&mut span.fields));
            }
        }

        fn on_close(&self, id: Id, _ctx: Context<'_, S>) {
            let mut journal = self.journal();
            if let Some(span) = journal.open.remove(&id.into_u64()) {
                journal.closed.push(span);
            }
        }

        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields::new();
            event.record(&mut FieldWriter(&mut fields));
            let metadata = event.metadata();
            self.journal().events.push(EventRecord {
                level: *metadata.level(),
                target: metadata.target().to_owned(),
                fields,
            });
        }
    }

    /// Renders strings verbatim and everything else through `Debug`.
    struct FieldWriter<'a>(&'a mut Fields);

    impl Visit for FieldWriter<'_> {
        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.insert(field.name().to_owned(), value.to_owned());
        }

        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            self.0.insert(field.name().to_owned(), format!("{value:?}"));
        }
    }

}

pub mod ci;
