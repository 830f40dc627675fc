mod graph_basic;
mod name_scope;
mod node_ops;
