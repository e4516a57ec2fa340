/*
 * Responsibility
 * - bearer: outgoing-request token injection (client side)
 * - cors / http: inbound gateway layers
 */
pub mod bearer;
pub mod cors;
pub mod http;
