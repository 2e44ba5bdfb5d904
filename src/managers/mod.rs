// pwgen-client managers
// Managers own stateful storage backends used by the services.

pub mod cookie_jar;
