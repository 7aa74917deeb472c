use std::io::{self, BufRead, Write};

use chat_stream::{ChatStreamClient, ExchangeHandler, SourceItem};
use chat_widget::{
    init_logging, ChatWidget, ReplyOutcome, StaticAuth, SubmitRejected, Viewport, WidgetConfig,
};

/// Prints deltas as they arrive while the widget keeps its transcript current.
struct EchoSink<'a, H> {
    inner: H,
    out: io::StdoutLock<'a>,
}

impl<H: ExchangeHandler> ExchangeHandler for EchoSink<'_, H> {
    fn on_chunk(&mut self, delta: &str) {
        let _ = write!(self.out, "{delta}");
        let _ = self.out.flush();
        self.inner.on_chunk(delta);
    }

    fn on_sources(&mut self, sources: &[SourceItem]) {
        self.inner.on_sources(sources);
    }

    fn on_complete(&mut self, full_text: &str) {
        let _ = writeln!(self.out);
        self.inner.on_complete(full_text);
    }

    fn on_error(&mut self, message: &str) {
        let _ = writeln!(self.out);
        self.inner.on_error(message);
    }
}

fn main() -> io::Result<()> {
    let config = WidgetConfig::from_env().map_err(io::Error::other)?;
    init_logging(&config);

    let mut client = ChatStreamClient::new(config.stream_config()).map_err(io::Error::other)?;
    let mut widget = ChatWidget::new(Viewport::new(380.0, 600.0), &config);
    let auth = StaticAuth::authenticated();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if let Some(greeting) = widget.transcript().last() {
        println!("{}", greeting.content);
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let pending = match widget.begin_submit(&line, &auth) {
            Ok(pending) => pending,
            Err(SubmitRejected::EmptyMessage) => continue,
            Err(rejected) => {
                eprintln!("{rejected}");
                continue;
            }
        };

        let result = {
            let mut sink = EchoSink {
                inner: widget.reply_sink(&pending),
                out: io::stdout().lock(),
            };
            runtime.block_on(client.send(pending.message(), &mut sink))
        };
        if let ReplyOutcome::Failed(apology) = widget.finish_submit(pending, result) {
            println!("{apology}");
        }
    }

    Ok(())
}
