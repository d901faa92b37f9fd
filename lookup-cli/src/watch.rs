//! `lookup translate --watch`: every input line is an edit of the source text.
//!
//! Plain lines replace the text and are debounced. `:from <code>`,
//! `:to <code>` and `:swap` act like the language selectors and translate
//! straight away.

use anyhow::Result;
use std::{io::Write, time::Duration};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    task::JoinSet,
};

use lookup_core::{
    Applied, Debouncer, Ticket, TranslationProvider, TranslationResponse, TranslatorSession,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Text(String),
    Source(String),
    Target(String),
    Swap,
}

pub fn parse_edit(line: &str) -> Edit {
    let trimmed = line.trim();
    if trimmed == ":swap" {
        return Edit::Swap;
    }
    if let Some(code) = trimmed.strip_prefix(":from ") {
        return Edit::Source(code.trim().to_string());
    }
    if let Some(code) = trimmed.strip_prefix(":to ") {
        return Edit::Target(code.trim().to_string());
    }
    Edit::Text(line.to_string())
}

/// Reads edits from `input` until it ends, writing each translation that is
/// still current to `out`. Returns once every started translation is done.
pub async fn run<P, R, W>(
    mut session: TranslatorSession<P>,
    quiet: Duration,
    input: R,
    mut out: W,
) -> Result<()>
where
    P: TranslationProvider + 'static,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (mut debouncer, mut requests) = Debouncer::new(quiet);
    let mut jobs: JoinSet<(Ticket, Result<TranslationResponse>)> = JoinSet::new();
    let mut lines = input.lines();
    let mut input_open = true;

    eprintln!(
        "Translating {} -> {}. Type text, or :from <code>, :to <code>, :swap. Ctrl-D to finish.",
        session.pair().source,
        session.pair().target
    );

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => match parse_edit(&line) {
                    Edit::Text(text) => {
                        debouncer.schedule(session.set_text(&text));
                        eprintln!("{}", session.counter());
                    }
                    Edit::Source(code) => debouncer.fire_now(session.set_source(&code)),
                    Edit::Target(code) => debouncer.fire_now(session.set_target(&code)),
                    Edit::Swap => debouncer.fire_now(session.swap()),
                },
                None => {
                    input_open = false;
                    if debouncer.is_pending() {
                        // Don't wait out the quiet period once input has ended.
                        debouncer.fire_now(session.request());
                    }
                }
            },
            Some(request) = requests.recv() => {
                let job = session.begin(request);
                let provider = session.provider();
                jobs.spawn(async move { job.run(provider.as_ref()).await });
            },
            Some(joined) = jobs.join_next() => match joined {
                Ok((ticket, result)) => {
                    if session.apply(ticket, result) != Applied::Stale {
                        writeln!(out, "{}", session.output())?;
                        out.flush()?;
                    }
                }
                Err(err) => tracing::error!("translation task did not finish: {err}"),
            },
        }

        if !input_open && !debouncer.is_pending() && requests.is_empty() && jobs.is_empty() {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lookup_core::{LanguagePair, TranslationRequest, debounce::DEFAULT_QUIET_PERIOD};
    use std::sync::{Arc, Mutex};
    use tokio::{
        io::{AsyncWriteExt, BufReader, DuplexStream},
        time::{Instant, sleep, timeout},
    };

    #[test]
    fn plain_lines_are_text_edits() {
        assert_eq!(parse_edit("hello world "), Edit::Text("hello world ".into()));
        assert_eq!(parse_edit(""), Edit::Text(String::new()));
    }

    #[test]
    fn commands_change_languages() {
        assert_eq!(parse_edit(":from de"), Edit::Source("de".into()));
        assert_eq!(parse_edit(" :to  pt "), Edit::Target("pt".into()));
        assert_eq!(parse_edit(":swap"), Edit::Swap);
    }

    #[test]
    fn unknown_command_is_text() {
        assert_eq!(parse_edit(":help"), Edit::Text(":help".into()));
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[derive(Debug)]
    struct Script {
        start: Instant,
        slow: Option<(&'static str, Duration)>,
        calls: Mutex<Vec<(Duration, TranslationRequest)>>,
    }

    /// Answers `"<target>:<text>"`, records call times, and delays one
    /// language pair. Panics on the text `boom`.
    #[derive(Debug, Clone)]
    struct ScriptedProvider(Arc<Script>);

    impl ScriptedProvider {
        fn new(slow: Option<(&'static str, Duration)>) -> Self {
            Self(Arc::new(Script { start: Instant::now(), slow, calls: Mutex::new(Vec::new()) }))
        }

        fn calls(&self) -> Vec<(Duration, TranslationRequest)> {
            self.0.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TranslationProvider for ScriptedProvider {
        async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
            if request.source_text == "boom" {
                panic!("provider failure");
            }
            self.0.calls.lock().unwrap().push((self.0.start.elapsed(), request.clone()));

            let delay = self.0.slow.filter(|(pair, _)| request.langpair() == *pair);
            if let Some((_, delay)) = delay {
                sleep(delay).await;
            }
            Ok(TranslationResponse {
                translated_text: format!("{}:{}", request.target_lang, request.source_text),
            })
        }
    }

    /// Writes each line after its delay, then closes the input `close_after` later.
    async fn feed(mut tx: DuplexStream, script: &'static [(u64, &'static str)], close_after: u64) {
        for (wait, line) in script {
            sleep(ms(*wait)).await;
            tx.write_all(format!("{line}\n").as_bytes()).await.unwrap();
        }
        sleep(ms(close_after)).await;
    }

    async fn watch(
        provider: &ScriptedProvider,
        script: &'static [(u64, &'static str)],
        close_after: u64,
    ) -> String {
        let (reader, writer) = tokio::io::duplex(1024);
        tokio::spawn(feed(writer, script, close_after));

        let session = TranslatorSession::new(LanguagePair::new("en", "es"), provider.clone());
        let mut out = Vec::new();
        timeout(
            Duration::from_secs(30),
            run(session, DEFAULT_QUIET_PERIOD, BufReader::new(reader), &mut out),
        )
        .await
        .expect("watch loop returns after input ends")
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn typing_burst_prints_one_translation() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "h"), (100, "ho"), (50, "hola")], 1000).await;

        assert_eq!(out, "es:hola\n");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0 >= ms(650) && calls[0].0 < ms(651));
    }

    #[tokio::test(start_paused = true)]
    async fn target_change_translates_without_waiting() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "good night"), (200, ":to fr")], 1000).await;

        assert_eq!(out, "fr:good night\n");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0 < ms(201));
        assert_eq!(calls[0].1.langpair(), "en|fr");
    }

    #[tokio::test(start_paused = true)]
    async fn swap_translates_previous_output_back() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "cat"), (600, ":swap")], 1000).await;

        assert_eq!(out, "es:cat\nen:es:cat\n");
        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1.langpair(), "es|en");
        assert!(calls[1].0 < ms(601));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_earlier_result_is_never_printed() {
        let provider = ScriptedProvider::new(Some(("en|es", ms(1000))));
        let out = watch(&provider, &[(0, "cat"), (600, ":to fr")], 100).await;

        assert_eq!(out, "fr:cat\n");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_flushes_pending_text() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "hola")], 0).await;

        assert_eq!(out, "es:hola\n");
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0 < DEFAULT_QUIET_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn end_of_input_after_selector_change_sends_nothing_more() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "hola"), (600, ":to fr")], 0).await;

        assert_eq!(out, "es:hola\nfr:hola\n");
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_translation_does_not_stall_the_loop() {
        let provider = ScriptedProvider::new(None);
        let out = watch(&provider, &[(0, "boom")], 0).await;

        assert_eq!(out, "");
        assert!(provider.calls().is_empty());
    }
}
