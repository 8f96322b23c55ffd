use std::sync::Once;

static INIT: Once = Once::new();

/// Route `log` (and `tracing`, via its `log` feature) somewhere visible and make panics loggable.
/// Safe to call more than once - only the first call has any effect.
pub fn init(level: log::LevelFilter) {
	INIT.call_once(|| {
		#[cfg(target_arch = "wasm32")]
		{
			console_error_panic_hook::set_once();

			let level = level.to_level().unwrap_or(log::Level::Error);
			if let Err(error) = console_log::init_with_level(level) {
				web_sys::console::warn_1(&format!("Failed to install console logger: {error}").into());
			}
		}

		#[cfg(not(target_arch = "wasm32"))]
		{
			use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

			let config = ConfigBuilder::new()
				.set_time_level(log::LevelFilter::Off)
				.build();

			if let Err(error) = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto) {
				eprintln!("Failed to install terminal logger: {error}");
			}

			log_panics::init();
		}

		log::debug!("Logging initialised at {level}");
	});
}
