//! Constantes del motor de recálculo.
//!
//! Valores estáticos que entran en el fingerprint de snapshot o en la
//! detección de cambios de fila. Tocar cualquiera de ellos altera qué
//! snapshots se consideran equivalentes entre corridas.

/// Versión lógica del motor de estequiometría. Se incluye en el
/// `SnapshotFingerprintInput` para que un cambio de versión del motor
/// invalide determinísticamente los fingerprints aunque la tabla no cambie.
/// Mantener estable mientras no haya cambios incompatibles en las reglas de
/// recálculo.
pub const ENGINE_VERSION: &str = "R1.0";

/// Tolerancia relativa usada al comparar valores numéricos de una fila
/// editada contra sus valores derivados actuales. Evita que el ruido de punto
/// flotante de una columna derivada se confunda con una edición del usuario.
pub const FIELD_DIFF_REL_TOLERANCE: f64 = 1e-9;
