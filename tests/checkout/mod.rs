mod checkout_detaches_head_on_a_digest;
mod checkout_restores_individual_paths;
