/// Protocol version sent with every payment request.
pub const PROTOCOL_VERSION: &str = "1.6";

/// Language used for catalog titles when none is configured.
pub const DEFAULT_LANGUAGE: &str = "lt";

/// Production endpoints.
pub const PRODUCTION_PUBLIC_KEY_URL: &str = "http://www.paysera.com/download/public.key";
pub const PRODUCTION_PAYMENT_URL: &str = "https://bank.paysera.com/pay/";
pub const PRODUCTION_PAYMENT_METHOD_LIST_URL: &str =
    "https://www.paysera.com/new/api/paymentMethods/";
pub const PRODUCTION_SMS_ANSWER_URL: &str = "https://bank.paysera.com/psms/respond/";

/// Sandbox endpoints.
pub const SANDBOX_PUBLIC_KEY_URL: &str = "http://sandbox.paysera.com/download/public.key";
pub const SANDBOX_PAYMENT_URL: &str = "https://sandbox.paysera.com/pay/";
pub const SANDBOX_PAYMENT_METHOD_LIST_URL: &str =
    "https://sandbox.paysera.com/new/api/paymentMethods/";
pub const SANDBOX_SMS_ANSWER_URL: &str = "https://sandbox.paysera.com/psms/respond/";

/// Timeout applied by the default HTTP transport.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
