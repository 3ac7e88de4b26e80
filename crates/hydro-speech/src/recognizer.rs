//! Speech recognition capability and the scripted terminal recognizer.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use hydro_core::config::SpeechConfig;
use hydro_core::error::HydroError;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Signal raised by a recognizer on its own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A final transcript was recognized.
    Result(String),
    /// Recognition ended (after stop, error, or silence).
    End,
}

/// Callback through which recognizers report [`SpeechEvent`]s.
///
/// Invoked from whatever task the recognizer runs on; the receiver is expected
/// to forward the event onto its own queue.
pub type SpeechEventSink = Arc<dyn Fn(SpeechEvent) + Send + Sync>;

/// Parameters handed to a recognizer when it is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerSettings {
    pub language: String,
    pub continuous: bool,
    /// Passed through for platform recognizers. The scripted recognizer
    /// only ever reports final results.
    pub interim_results: bool,
}

impl From<&SpeechConfig> for RecognizerSettings {
    fn from(config: &SpeechConfig) -> Self {
        Self {
            language: config.language.clone(),
            continuous: config.continuous,
            interim_results: config.interim_results,
        }
    }
}

/// A platform speech recognition capability.
///
/// `start` and `stop` only request work; outcomes arrive later through the
/// sink given to the recognizer at construction. Every session must end with
/// exactly one [`SpeechEvent::End`], whether it stopped, failed, or timed out.
pub trait SpeechRecognizer: Send {
    fn start(&mut self) -> Result<(), HydroError>;
    fn stop(&mut self) -> Result<(), HydroError>;
}

/// Recognizer that replays configured transcripts, one per listening session
/// (or all remaining ones in continuous mode).
///
/// With nothing left to replay it behaves like a silence timeout: the session
/// ends without a result.
pub struct ScriptedRecognizer {
    settings: RecognizerSettings,
    transcripts: VecDeque<String>,
    result_delay: Duration,
    sink: SpeechEventSink,
    session: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ScriptedRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedRecognizer")
            .field("settings", &self.settings)
            .field("remaining", &self.transcripts.len())
            .field("result_delay", &self.result_delay)
            .field("running", &self.is_running())
            .finish()
    }
}

impl ScriptedRecognizer {
    pub fn new(
        settings: RecognizerSettings,
        transcripts: Vec<String>,
        result_delay: Duration,
        sink: SpeechEventSink,
    ) -> Self {
        Self {
            settings,
            transcripts: transcripts.into(),
            result_delay,
            sink,
            session: None,
        }
    }

    /// Build a recognizer from the `[speech]` config section.
    pub fn from_config(config: &SpeechConfig, sink: SpeechEventSink) -> Self {
        Self::new(
            RecognizerSettings::from(config),
            config.transcripts.clone(),
            Duration::from_millis(config.result_delay_ms),
            sink,
        )
    }

    /// Number of transcripts not yet replayed.
    pub fn remaining(&self) -> usize {
        self.transcripts.len()
    }

    fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<(), HydroError> {
        if self.is_running() {
            return Err(HydroError::Speech(
                "Recognition is already running".to_string(),
            ));
        }

        let runtime = Handle::try_current().map_err(|_| {
            HydroError::Speech("Recognition needs a tokio runtime".to_string())
        })?;

        let batch: Vec<String> = if self.settings.continuous {
            self.transcripts.drain(..).collect()
        } else {
            self.transcripts.pop_front().into_iter().collect()
        };

        tracing::info!(
            language = %self.settings.language,
            continuous = self.settings.continuous,
            queued = batch.len(),
            "Speech recognition started"
        );

        let sink = Arc::clone(&self.sink);
        let delay = self.result_delay;
        self.session = Some(runtime.spawn(async move {
            if batch.is_empty() {
                // Nothing to say: end after one silent interval.
                tokio::time::sleep(delay).await;
            }
            for transcript in batch {
                tokio::time::sleep(delay).await;
                sink(SpeechEvent::Result(transcript));
            }
            sink(SpeechEvent::End);
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), HydroError> {
        match self.session.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                tracing::info!("Speech recognition stopped");
                (self.sink)(SpeechEvent::End);
                Ok(())
            }
            _ => Err(HydroError::Speech("Recognition is not running".to_string())),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collecting_sink() -> (SpeechEventSink, Arc<Mutex<Vec<SpeechEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&events);
        let sink: SpeechEventSink = Arc::new(move |event| {
            captured.lock().unwrap().push(event);
        });
        (sink, events)
    }

    fn settings(continuous: bool) -> RecognizerSettings {
        RecognizerSettings {
            language: "en-US".to_string(),
            continuous,
            interim_results: false,
        }
    }

    fn script(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_shot_replays_one_transcript() {
        let (sink, events) = collecting_sink();
        let mut rec = ScriptedRecognizer::new(
            settings(false),
            script(&["groundwater in Pune", "thanks"]),
            Duration::from_millis(800),
            sink,
        );

        rec.start().unwrap();
        assert_eq!(rec.remaining(), 1);
        tokio::time::sleep(Duration::from_secs(2)).await;

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                SpeechEvent::Result("groundwater in Pune".to_string()),
                SpeechEvent::End
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_continuous_replays_everything() {
        let (sink, events) = collecting_sink();
        let mut rec = ScriptedRecognizer::new(
            settings(true),
            script(&["one", "two"]),
            Duration::from_millis(100),
            sink,
        );

        rec.start().unwrap();
        assert_eq!(rec.remaining(), 0);
        tokio::time::sleep(Duration::from_secs(1)).await;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], SpeechEvent::End);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_script_ends_without_result() {
        let (sink, events) = collecting_sink();
        let mut rec =
            ScriptedRecognizer::new(settings(false), vec![], Duration::from_millis(100), sink);

        rec.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(*events.lock().unwrap(), vec![SpeechEvent::End]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_result_emits_only_end() {
        let (sink, events) = collecting_sink();
        let mut rec = ScriptedRecognizer::new(
            settings(false),
            script(&["never heard"]),
            Duration::from_secs(5),
            sink,
        );

        rec.start().unwrap();
        rec.stop().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*events.lock().unwrap(), vec![SpeechEvent::End]);
    }

    #[tokio::test]
    async fn test_stop_when_not_running_fails() {
        let (sink, _events) = collecting_sink();
        let mut rec =
            ScriptedRecognizer::new(settings(false), vec![], Duration::from_millis(1), sink);
        let err = rec.stop().unwrap_err();
        assert!(err.to_string().contains("not running"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_fails() {
        let (sink, _events) = collecting_sink();
        let mut rec = ScriptedRecognizer::new(
            settings(false),
            script(&["a"]),
            Duration::from_secs(5),
            sink,
        );
        rec.start().unwrap();
        let err = rec.start().unwrap_err();
        assert!(err.to_string().contains("already running"));
    }

    #[test]
    fn test_settings_from_config() {
        let config = SpeechConfig {
            language: "de-DE".to_string(),
            continuous: true,
            ..SpeechConfig::default()
        };
        let s = RecognizerSettings::from(&config);
        assert_eq!(s.language, "de-DE");
        assert!(s.continuous);
        assert!(!s.interim_results);
    }

    #[test]
    fn test_start_outside_runtime_fails_without_consuming_script() {
        let (sink, events) = collecting_sink();
        let mut rec = ScriptedRecognizer::new(
            settings(false),
            script(&["kept"]),
            Duration::from_millis(1),
            sink,
        );
        let err = rec.start().unwrap_err();
        assert!(err.to_string().contains("tokio runtime"));
        assert_eq!(rec.remaining(), 1);
        assert!(events.lock().unwrap().is_empty());
    }
}
