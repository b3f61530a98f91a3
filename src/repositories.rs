use crate::models::{
    Customer, FindCustomerError, FindCustomerRequest, FindCustomersError, FindReservationError,
    FindReservationRequest, FindReservationsError, Reservation, SaveCustomerError,
    SaveReservationError,
};
use async_trait::async_trait;

#[async_trait]
pub trait CustomerRepository: Send + Sync + 'static {
    /// All customers, ordered by last name then first name.
    async fn find_all_customers(&self) -> Result<Vec<Customer>, FindCustomersError>;

    async fn find_customer(&self, req: &FindCustomerRequest) -> Result<Customer, FindCustomerError>;

    /// Customers whose first or last name contains `fragment`, ignoring case.
    async fn search_customers(&self, fragment: &str) -> Result<Vec<Customer>, FindCustomersError>;

    /// Up to ten customers with the most reservations, ties broken by first
    /// name. Customers without reservations are never included.
    async fn find_top_customers(&self) -> Result<Vec<Customer>, FindCustomersError>;

    /// Inserts the customer when it has no id yet, assigning the generated id,
    /// and updates it by id otherwise.
    async fn save_customer(&self, customer: &mut Customer) -> Result<i64, SaveCustomerError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync + 'static {
    async fn find_reservations_for_customer(
        &self,
        customer_id: i64,
    ) -> Result<Vec<Reservation>, FindReservationsError>;

    async fn find_reservation(
        &self,
        req: &FindReservationRequest,
    ) -> Result<Reservation, FindReservationError>;

    /// Inserts or updates like [`CustomerRepository::save_customer`]. The owning
    /// customer is never rewritten on update.
    async fn save_reservation(
        &self,
        reservation: &mut Reservation,
    ) -> Result<i64, SaveReservationError>;
}
