//! Configuración central del binario.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) más la inicialización del logger de terminal.
use once_cell::sync::Lazy;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::env;

/// Configuración global del CLI (extensible para más secciones).
pub struct AppConfig {
    /// Configuración específica de logging.
    pub logging: LoggingConfig,
}

/// Parámetros del logger de consola.
pub struct LoggingConfig {
    /// Nivel: error | warn | info | debug | trace.
    pub level: LevelFilter,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let level = env::var("STOICH_LOG").ok()
                                      .and_then(|v| v.parse::<LevelFilter>().ok())
                                      .unwrap_or(LevelFilter::Info);
    AppConfig { logging: LoggingConfig { level } }
});

/// Inicializa el logger según `CONFIG`. Una segunda llamada no tiene efecto.
pub fn init_logging() {
    let _ = TermLogger::init(CONFIG.logging.level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto);
}
