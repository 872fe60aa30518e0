pub mod health;
pub mod vacancies;
