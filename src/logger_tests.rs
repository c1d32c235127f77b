//! Tests for the console logger.

use std::sync::Arc;

use super::*;

/// Sink that keeps everything written to it.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn logger(options: LoggerOptions) -> (Logger, SharedBuffer) {
    let buffer = SharedBuffer::default();
    (Logger::with_writer(options, buffer.clone()), buffer)
}

mod levels {
    use super::*;

    #[test]
    fn tagged_levels_are_written() {
        let (logger, buffer) = logger(LoggerOptions::default());

        logger.log("plain");
        logger.info("started");
        logger.warn("slow");
        logger.error("failed");

        assert_eq!(
            buffer.contents(),
            "plain\ninfo: started\nwarn: slow\nerror: failed\n"
        );
    }

    #[test]
    fn debug_and_verbose_are_gated() {
        let (logger, buffer) = logger(LoggerOptions::default());

        logger.debug("hidden");
        logger.verbose("hidden too");

        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn debug_and_verbose_written_when_enabled() {
        let (logger, buffer) = logger(LoggerOptions {
            debug: true,
            ..LoggerOptions::default()
        });

        logger.debug("details");
        logger.verbose("more");

        assert_eq!(buffer.contents(), "debug: details\nmore\n");
    }

    #[test]
    fn silent_suppresses_everything() {
        let (logger, buffer) = logger(LoggerOptions {
            silent: true,
            debug: true,
            dry_run: true,
            is_ci: false,
        });

        logger.log("a");
        logger.info("b");
        logger.error("c");
        logger.debug("d");
        logger.exec(["echo", "e"]);
        logger.obtrusive("f");

        assert!(buffer.contents().is_empty());
    }
}

mod exec {
    use super::*;

    #[test]
    fn echoes_only_in_dry_run() {
        let (logger, buffer) = logger(LoggerOptions::default());

        logger.exec(["curl", "https://example.com"]);

        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn dry_run_echoes_command() {
        let (logger, buffer) = logger(LoggerOptions {
            dry_run: true,
            ..LoggerOptions::default()
        });

        logger.exec(["curl", "-X", "POST", "https://example.com/items"]);

        assert_eq!(buffer.contents(), "$ curl -X POST https://example.com/items\n");
    }

    #[test]
    fn arguments_with_metacharacters_are_quoted() {
        let (logger, buffer) = logger(LoggerOptions {
            dry_run: true,
            ..LoggerOptions::default()
        });

        logger.exec(["curl", "-H", "Accept: text/plain", "-d", "it's", ""]);

        assert_eq!(
            buffer.contents(),
            "$ curl -H 'Accept: text/plain' -d 'it'\\''s' ''\n"
        );
    }
}

mod obtrusive {
    use super::*;

    #[test]
    fn padded_outside_ci() {
        let (logger, buffer) = logger(LoggerOptions::default());

        logger.obtrusive("Done");

        assert_eq!(buffer.contents(), "\nDone\n\n");
    }

    #[test]
    fn not_padded_in_ci() {
        let (logger, buffer) = logger(LoggerOptions {
            is_ci: true,
            ..LoggerOptions::default()
        });

        logger.obtrusive("Done");

        assert_eq!(buffer.contents(), "Done\n");
    }
}

#[test]
fn debug_format_hides_sink() {
    let (logger, _) = logger(LoggerOptions::default());

    let debug = format!("{logger:?}");

    assert!(debug.contains("Logger"));
    assert!(debug.contains("options"));
}
