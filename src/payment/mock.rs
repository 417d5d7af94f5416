use async_trait::async_trait;
use mockall::mock;

use super::{CheckoutSession, CheckoutSessionRequest, PaymentError, PaymentGateway};

mock! {
    pub PaymentGateway {}

    #[async_trait]
    impl PaymentGateway for PaymentGateway {
        async fn create_checkout_session(&self, request: &CheckoutSessionRequest) -> Result<CheckoutSession, PaymentError>;
        async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession, PaymentError>;
    }
}
