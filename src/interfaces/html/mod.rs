pub mod payment_form;
