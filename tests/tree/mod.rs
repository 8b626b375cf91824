mod ls_tree_flag_combinations;
mod write_tree_uses_the_canonical_sort;
